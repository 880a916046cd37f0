use bevy_ecs::prelude::Component;
use rustc_hash::FxHashSet;

use crate::components::animation::AnimCategory;

/// Tracks which trigger frames already played a sound this cycle.
#[derive(Component, Debug, Clone, Default)]
pub struct SoundCursor {
    pub key: Option<AnimCategory>,
    /// Animator wrap count the `fired` record belongs to.
    pub wraps: u32,
    /// 1-based frames fired since the last wrap or key change.
    pub fired: FxHashSet<u32>,
}
