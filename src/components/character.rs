//! Character components read by the animator.
//!
//! The movement/collision layer owns these values; the animator only reads
//! them (direction, moving and dashing flags, screen position) and toggles the
//! movement lock while a manual action plays.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Four-way facing used by grid movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// All directions in sheet lookup order.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// Map a numpad-style direction code (2/4/6/8). Anything else faces down.
    pub fn from_numpad(code: u8) -> Self {
        match code {
            4 => Direction::Left,
            6 => Direction::Right,
            8 => Direction::Up,
            _ => Direction::Down,
        }
    }

    pub fn numpad(self) -> u8 {
        match self {
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Up => 8,
        }
    }

    /// Capitalized suffix used in row-map entry names (`idleDown`, `walkUp_a`).
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
        }
    }

    /// Parse a lowercase direction word as used by script commands.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            _ => None,
        }
    }

    /// Grid delta for one step in this direction (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
        }
    }
}

/// Snapshot of a map character as seen by the animator.
#[derive(Component, Debug, Clone)]
pub struct Character {
    /// Graphic resource name (e.g. `teo_$(memao)`).
    pub graphic: String,
    pub direction: Direction,
    pub moving: bool,
    pub dashing: bool,
    pub screen_x: f32,
    pub screen_y: f32,
    pub screen_z: i32,
    pub transparent: bool,
    pub opacity: u8,
    /// Set while a manual action plays; movement must not update or start.
    pub movement_locked: bool,
}

impl Character {
    pub fn new(graphic: impl Into<String>) -> Self {
        Self {
            graphic: graphic.into(),
            direction: Direction::Down,
            moving: false,
            dashing: false,
            screen_x: 0.0,
            screen_y: 0.0,
            screen_z: 3,
            transparent: false,
            opacity: 255,
            movement_locked: false,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_screen_position(mut self, x: f32, y: f32) -> Self {
        self.screen_x = x;
        self.screen_y = y;
        self
    }
}

/// Marker for the player character.
#[derive(Component, Clone, Debug)]
pub struct Player;

/// Marker for party followers; they dash whenever the player dashes.
#[derive(Component, Clone, Debug)]
pub struct Follower;

/// Map event with its engine-side id.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapEvent {
    pub id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numpad_codes_round_trip_and_default_down() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_numpad(dir.numpad()), dir);
        }
        assert_eq!(Direction::from_numpad(0), Direction::Down);
        assert_eq!(Direction::from_numpad(5), Direction::Down);
    }

    #[test]
    fn parse_accepts_mixed_case_and_rejects_current() {
        assert_eq!(Direction::parse(" Left "), Some(Direction::Left));
        assert_eq!(Direction::parse("UP"), Some(Direction::Up));
        assert_eq!(Direction::parse("current"), None);
    }
}
