//! World setup and the per-tick schedule.
//!
//! A host embeds the animator in three steps:
//!
//! 1. [`setup_world`] inserts the resources (range table, configuration,
//!    texture store, wait registry, audio bridge) and hands back the audio
//!    receiver.
//! 2. [`build_schedule`] returns the ordered per-tick systems.
//! 3. [`tick`] runs them once and clears change trackers. Script hooks
//!    ([`play_action`](crate::systems::actions::play_action),
//!    [`poll_wait`](crate::systems::waitmode::poll_wait), ...) are called
//!    between ticks with exclusive world access.

use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use log::info;

use crate::events::audio::AudioCmd;
use crate::resources::animatorconfig::AnimatorConfig;
use crate::resources::audio::setup_audio;
use crate::resources::rangetable::RangeTable;
use crate::resources::texturestore::TextureStore;
use crate::resources::waitregistry::WaitRegistry;
use crate::systems::animation::memao_animation;
use crate::systems::audio::{forward_audio_cmds, update_bevy_audio_cmds};
use crate::systems::framesound::frame_sound_system;
use crate::systems::movement::{follower_dash_sync, grid_movement};
use crate::systems::spriteswap::memao_sprite_swap;

/// Insert every resource the animator systems need.
///
/// The range table comes from `config.row_map_path` when set; a missing or
/// invalid file falls back to the built-in layout.
pub fn setup_world(world: &mut World, config: AnimatorConfig) -> Receiver<AudioCmd> {
    let table = RangeTable::load(config.row_map_path.as_deref());
    info!("Range table ready: {} entries", table.len());
    world.insert_resource(table);
    world.insert_resource(config);
    world.insert_resource(TextureStore::new());
    world.insert_resource(WaitRegistry::default());
    setup_audio(world)
}

/// Per-tick systems in execution order.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(follower_dash_sync);
    update.add_systems(grid_movement.after(follower_dash_sync));
    // Attach/detach must be applied before the animator sees the entity.
    update.add_systems(memao_sprite_swap.after(grid_movement));
    update.add_systems(memao_animation.after(memao_sprite_swap));
    update.add_systems(frame_sound_system.after(memao_animation));
    update.add_systems(forward_audio_cmds.after(frame_sound_system));
    update.add_systems(update_bevy_audio_cmds.after(forward_audio_cmds));
    update
}

/// Run one tick.
pub fn tick(world: &mut World, schedule: &mut Schedule) {
    schedule.run(world);
    world.clear_trackers();
}
