//! Tile-by-tile movement along a queued route.
//!
//! A small stand-in for the host's movement layer: it feeds the animator the
//! same inputs a tile engine would (facing, moving flag, screen position) and
//! respects the movement lock.

use std::collections::VecDeque;

use bevy_ecs::prelude::Component;

use crate::components::character::Direction;

/// Ticks for one tile step when walking.
pub const DEFAULT_STEP_TICKS: u32 = 16;

#[derive(Component, Debug, Clone)]
pub struct GridMover {
    pub tile_x: i32,
    pub tile_y: i32,
    /// Tile edge in screen pixels.
    pub tile_size: f32,
    /// Ticks per tile while walking; dashing halves it.
    pub step_ticks: u32,
    /// Step in progress and ticks spent on it.
    pub stepping: Option<Direction>,
    pub progress: u32,
    pub route: VecDeque<Direction>,
}

impl GridMover {
    pub fn new(tile_x: i32, tile_y: i32, tile_size: f32) -> Self {
        Self {
            tile_x,
            tile_y,
            tile_size,
            step_ticks: DEFAULT_STEP_TICKS,
            stepping: None,
            progress: 0,
            route: VecDeque::new(),
        }
    }

    pub fn with_step_ticks(mut self, ticks: u32) -> Self {
        self.step_ticks = ticks.max(1);
        self
    }

    /// Append steps to the route.
    pub fn push_route(&mut self, steps: impl IntoIterator<Item = Direction>) {
        self.route.extend(steps);
    }

    pub fn is_idle(&self) -> bool {
        self.stepping.is_none() && self.route.is_empty()
    }

    pub fn ticks_for_step(&self, dashing: bool) -> u32 {
        if dashing {
            (self.step_ticks / 2).max(1)
        } else {
            self.step_ticks
        }
    }

    /// Screen anchor (bottom-center of the tile), interpolated mid-step.
    pub fn screen_position(&self, dashing: bool) -> (f32, f32) {
        let (mut fx, mut fy) = (self.tile_x as f32, self.tile_y as f32);
        if let Some(dir) = self.stepping {
            let t = self.progress as f32 / self.ticks_for_step(dashing) as f32;
            let (dx, dy) = dir.delta();
            fx += dx as f32 * t;
            fy += dy as f32 * t;
        }
        (
            (fx + 0.5) * self.tile_size,
            (fy + 1.0) * self.tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_position_interpolates_mid_step() {
        let mut mover = GridMover::new(2, 3, 48.0).with_step_ticks(8);
        assert_eq!(mover.screen_position(false), (120.0, 192.0));
        mover.stepping = Some(Direction::Right);
        mover.progress = 4;
        assert_eq!(mover.screen_position(false), (144.0, 192.0));
        // Same progress is the whole step when dashing.
        assert_eq!(mover.screen_position(true), (168.0, 192.0));
    }
}
