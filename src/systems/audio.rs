//! Systems bridging ECS audio messages with the host backend.
//!
//! - [`forward_audio_cmds`] sends every [`AudioCmd`] written this frame over
//!   the [`AudioBridge`] channel.
//! - [`update_bevy_audio_cmds`] advances the ECS message queue so old
//!   messages are dropped.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use crate::events::audio::AudioCmd;
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::{MessageReader, Messages, Res, ResMut};

/// Forward ECS AudioCmd messages to the host via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // Ignore send error when the host dropped its receiver
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}
