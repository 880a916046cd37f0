use bevy_ecs::prelude::*;

use crate::components::character::{Character, Follower, Player};
use crate::components::gridmover::GridMover;

/// Whether a character may start a new step this tick.
pub fn can_move(character: &Character) -> bool {
    !character.movement_locked
}

/// Advance grid movers by one tick.
///
/// Locked characters are skipped entirely: an in-progress step freezes and
/// no new step starts until the lock is released.
pub fn grid_movement(mut query: Query<(&mut Character, &mut GridMover)>) {
    for (mut character, mut mover) in query.iter_mut() {
        if character.movement_locked {
            continue;
        }

        if let Some(dir) = mover.stepping {
            mover.progress += 1;
            if mover.progress >= mover.ticks_for_step(character.dashing) {
                let (dx, dy) = dir.delta();
                mover.tile_x += dx;
                mover.tile_y += dy;
                mover.stepping = None;
                mover.progress = 0;
            }
        }

        if mover.stepping.is_none() && can_move(&character) {
            if let Some(dir) = mover.route.pop_front() {
                character.direction = dir;
                mover.stepping = Some(dir);
            }
        }

        character.moving = mover.stepping.is_some();
        let (x, y) = mover.screen_position(character.dashing);
        character.screen_x = x;
        character.screen_y = y;
    }
}

/// Followers dash whenever the player does.
pub fn follower_dash_sync(
    player: Query<&Character, With<Player>>,
    mut followers: Query<&mut Character, (With<Follower>, Without<Player>)>,
) {
    let Some(dashing) = player.iter().next().map(|p| p.dashing) else {
        return;
    };
    for mut follower in followers.iter_mut() {
        if follower.dashing != dashing {
            follower.dashing = dashing;
        }
    }
}
