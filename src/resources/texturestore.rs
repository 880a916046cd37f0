//! Texture readiness registry.
//!
//! Images load asynchronously on the host side. Sprites only reference a
//! texture key; systems ask this store whether that key is ready before they
//! touch the sprite. Unknown keys are not ready.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    Loading,
    Ready { width: u32, height: u32 },
    Failed,
}

#[derive(Resource, Debug, Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, TextureStatus>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` has been requested. Keeps any known status.
    pub fn request(&mut self, key: &str) {
        self.map
            .entry(key.to_string())
            .or_insert(TextureStatus::Loading);
    }

    pub fn mark_ready(&mut self, key: impl Into<String>, width: u32, height: u32) {
        self.map
            .insert(key.into(), TextureStatus::Ready { width, height });
    }

    pub fn mark_failed(&mut self, key: impl Into<String>) {
        self.map.insert(key.into(), TextureStatus::Failed);
    }

    pub fn status(&self, key: &str) -> Option<TextureStatus> {
        self.map.get(key).copied()
    }

    pub fn is_ready(&self, key: &str) -> bool {
        matches!(self.map.get(key), Some(TextureStatus::Ready { .. }))
    }

    /// Keys still waiting on the host loader.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.map
            .iter()
            .filter(|(_, s)| **s == TextureStatus::Loading)
            .map(|(k, _)| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_does_not_downgrade_ready() {
        let mut store = TextureStore::new();
        store.request("a");
        assert!(!store.is_ready("a"));
        assert_eq!(store.pending().count(), 1);
        store.mark_ready("a", 384, 1152);
        store.request("a");
        assert!(store.is_ready("a"));
        assert_eq!(store.pending().count(), 0);
        assert!(!store.is_ready("missing"));
    }
}
