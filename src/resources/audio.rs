//! ECS resources that bridge the animator with the host audio backend.
//!
//! Use [`setup_audio`] once during initialization to insert the
//! [`AudioBridge`] and `Messages<AudioCmd>` resources. The returned receiver
//! belongs to the host, which drains it on its own schedule (often a
//! dedicated audio thread).

use crate::events::audio::AudioCmd;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Shared bridge between the ECS world and the host audio backend.
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> host).
    pub tx_cmd: Sender<AudioCmd>,
}

/// Create the command channel and register bridge resources.
///
/// Returns the receiving end for the host audio backend.
pub fn setup_audio(world: &mut World) -> Receiver<AudioCmd> {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    world.insert_resource(AudioBridge { tx_cmd });
    world.insert_resource(Messages::<AudioCmd>::default());
    rx_cmd
}
