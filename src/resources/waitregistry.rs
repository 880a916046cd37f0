//! Pending script waits on manual actions.
//!
//! An interpreter that issued a waiting `PlayAction` has one entry here until
//! [`poll_wait`](crate::systems::waitmode::poll_wait) releases it.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

/// Host-side identity of a script interpreter (map interpreter, common event
/// runner, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterpreterId(pub u32);

/// Condition that ends a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// The target's `finished` edge flag.
    Finished,
    /// `cycle_count >= start + count`.
    Cycles { start: u32, count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionWait {
    pub target: Entity,
    pub until: WaitUntil,
}

#[derive(Resource, Debug, Default)]
pub struct WaitRegistry {
    pub waits: FxHashMap<InterpreterId, ActionWait>,
}

impl WaitRegistry {
    /// Register a wait, replacing any previous one for `interpreter`.
    pub fn register(&mut self, interpreter: InterpreterId, wait: ActionWait) {
        self.waits.insert(interpreter, wait);
    }

    pub fn get(&self, interpreter: InterpreterId) -> Option<ActionWait> {
        self.waits.get(&interpreter).copied()
    }

    pub fn release(&mut self, interpreter: InterpreterId) -> Option<ActionWait> {
        self.waits.remove(&interpreter)
    }

    pub fn is_waiting(&self, interpreter: InterpreterId) -> bool {
        self.waits.contains_key(&interpreter)
    }
}
