//! Memao animator library.
//!
//! This module exposes the animator's ECS components, resources, systems, and
//! messages for hosts that embed it and for integration tests.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
