//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems and script hooks. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `animatorconfig` – INI-backed sheet, fps, offsets and sound settings
//! - `audio` – bridge and channel towards the host audio backend
//! - `rangetable` – compiled row/frame ranges and the range picker
//! - `texturestore` – load status of sheet images keyed by graphic name
//! - `waitregistry` – interpreters blocked on a manual action
pub mod animatorconfig;
pub mod audio;
pub mod rangetable;
pub mod texturestore;
pub mod waitregistry;
