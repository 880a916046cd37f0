//! Message types exchanged across systems.
//!
//! Submodules:
//! - [`audio`] – sound-effect commands forwarded to the host audio backend
pub mod audio;
