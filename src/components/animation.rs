use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::character::Direction;

/// Who drives the animation: movement (auto) or a script command (manual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimMode {
    #[default]
    Auto,
    Manual,
}

/// Lowercased, non-empty action name (`axe_chop`, `plant`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionName(String);

// Spellings accepted by the PlayAction command.
const ACTION_ALIASES: &[(&str, &str)] = &[
    ("pick up", "pickup"),
    ("pick-up", "pickup"),
    ("pick", "pickup"),
    ("pick axe", "pickaxe"),
    ("mining", "pickaxe"),
    ("chop", "axe_chop"),
    ("chopping", "axe_chop"),
    ("sow", "plant"),
    ("seed", "plant"),
    ("watering", "water"),
    ("scythe", "reap"),
];

impl ActionName {
    /// Lowercase and trim; `None` for an empty name.
    pub fn new(raw: &str) -> Option<Self> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    /// Like [`ActionName::new`] but resolves command aliases and maps an empty
    /// name to `idle`.
    pub fn canonical(raw: &str) -> Self {
        let Some(name) = Self::new(raw) else {
            return Self::idle();
        };
        ACTION_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name.0)
            .map(|(_, target)| Self((*target).to_string()))
            .unwrap_or(name)
    }

    pub fn idle() -> Self {
        Self("idle".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-character animation state, created on first access and owned by the
/// character entity.
#[derive(Debug, Clone, Component, Serialize, Deserialize)]
pub struct AnimationState {
    pub mode: AnimMode,
    pub action: ActionName,
    pub direction: Direction,
    pub looped: bool,
    /// Set once when a non-looping manual action completes; cleared by the
    /// wait poller.
    pub finished: bool,
    /// Completed sequence wraps since the state was created.
    pub cycle_count: u32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            mode: AnimMode::Auto,
            action: ActionName::idle(),
            direction: Direction::Down,
            looped: false,
            finished: false,
            cycle_count: 0,
        }
    }
}

impl AnimationState {
    pub fn is_manual(&self) -> bool {
        self.mode == AnimMode::Manual
    }

    /// Enter manual mode for `action`. Clears the completion flag.
    pub fn begin(&mut self, action: ActionName, direction: Direction, looped: bool) {
        self.mode = AnimMode::Manual;
        self.action = action;
        self.direction = direction;
        self.looped = looped;
        self.finished = false;
    }

    /// Natural end of a non-looping action.
    pub fn complete(&mut self) {
        self.mode = AnimMode::Auto;
        self.finished = true;
    }

    /// Forced end; does not raise the completion flag.
    pub fn stop(&mut self) {
        self.mode = AnimMode::Auto;
    }
}

/// Which slice of the range table drives the sprite this tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnimCategory {
    Idle(Direction),
    Walk(Direction),
    Run(Direction),
    Action(ActionName, Direction),
}

impl AnimCategory {
    pub fn direction(&self) -> Direction {
        match self {
            AnimCategory::Idle(d)
            | AnimCategory::Walk(d)
            | AnimCategory::Run(d)
            | AnimCategory::Action(_, d) => *d,
        }
    }

    /// Clip name as used by per-clip settings (`idle`, `walk`, `axe_chop`).
    pub fn clip(&self) -> &str {
        match self {
            AnimCategory::Idle(_) => "idle",
            AnimCategory::Walk(_) => "walk",
            AnimCategory::Run(_) => "run",
            AnimCategory::Action(action, _) => action.as_str(),
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, AnimCategory::Action(..))
    }
}

impl std::fmt::Display for AnimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimCategory::Action(action, d) => write!(f, "act:{}:{}", action, d.numpad()),
            other => write!(f, "{}:{}", other.clip(), other.direction().numpad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_name_is_case_insensitive() {
        assert_eq!(ActionName::new("  Axe_Chop "), ActionName::new("axe_chop"));
        assert!(ActionName::new("   ").is_none());
    }

    #[test]
    fn canonical_resolves_aliases() {
        assert_eq!(ActionName::canonical("Chop").as_str(), "axe_chop");
        assert_eq!(ActionName::canonical("pick up").as_str(), "pickup");
        assert_eq!(ActionName::canonical("scythe").as_str(), "reap");
        assert_eq!(ActionName::canonical("").as_str(), "idle");
        assert_eq!(ActionName::canonical("Dance").as_str(), "dance");
    }

    #[test]
    fn begin_then_complete_raises_finished_once() {
        let mut st = AnimationState::default();
        st.finished = true;
        st.begin(ActionName::canonical("water"), Direction::Left, false);
        assert!(st.is_manual());
        assert!(!st.finished);
        st.complete();
        assert_eq!(st.mode, AnimMode::Auto);
        assert!(st.finished);
    }

    #[test]
    fn stop_leaves_finished_untouched() {
        let mut st = AnimationState::default();
        st.begin(ActionName::canonical("hoe"), Direction::Up, true);
        st.stop();
        assert_eq!(st.mode, AnimMode::Auto);
        assert!(!st.finished);
    }

    #[test]
    fn category_key_format() {
        let idle = AnimCategory::Idle(Direction::Left);
        let act = AnimCategory::Action(ActionName::canonical("chop"), Direction::Up);
        assert_eq!(idle.to_string(), "idle:4");
        assert_eq!(act.to_string(), "act:axe_chop:8");
        assert_eq!(act.clip(), "axe_chop");
    }
}
