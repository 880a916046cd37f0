//! Interpreter wait-mode poll for manual actions.
//!
//! The host calls [`poll_wait`] once per tick for an interpreter that is in
//! the action wait mode. It returns `true` while the interpreter must keep
//! waiting and `false` exactly once when the wait is satisfied, at which point
//! the registration is dropped.
//!
//! A wait is satisfied when any of these hold:
//! - the target no longer exists or has no animation state;
//! - [`WaitUntil::Finished`]: the target's `finished` flag is set (consumed);
//! - [`WaitUntil::Cycles`]: `cycle_count` reached `start + count`;
//! - the target left manual mode (e.g. after `StopAction`).

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animation::AnimationState;
use crate::resources::waitregistry::{InterpreterId, WaitRegistry, WaitUntil};

/// Poll the wait registered for `interpreter`. `true` means keep waiting.
pub fn poll_wait(world: &mut World, interpreter: InterpreterId) -> bool {
    let Some(wait) = world
        .get_resource::<WaitRegistry>()
        .and_then(|registry| registry.get(interpreter))
    else {
        return false;
    };

    let waiting = match world.get_mut::<AnimationState>(wait.target) {
        None => {
            debug!("{:?}: wait target {:?} is gone", interpreter, wait.target);
            false
        }
        Some(mut state) => match wait.until {
            WaitUntil::Finished => {
                if state.finished {
                    state.finished = false;
                    false
                } else {
                    state.is_manual()
                }
            }
            WaitUntil::Cycles { start, count } => {
                state.cycle_count < start.saturating_add(count) && state.is_manual()
            }
        },
    };

    if !waiting {
        world.resource_mut::<WaitRegistry>().release(interpreter);
        debug!("{:?}: wait on {:?} released", interpreter, wait.target);
    }
    waiting
}
