//! ECS components for characters and their animators.
//!
//! This module groups the data attached to character entities: the inputs the
//! host's movement layer supplies, the per-character animation state driven by
//! script commands, and the per-sprite playback state of the Memao animator.
//!
//! Submodules overview:
//! - [`animation`] – animation mode, action names and the per-tick category
//! - [`animator`] – frame sequences, sequence transforms and playback state
//! - [`character`] – facing, movement flags, screen position and markers
//! - [`gridmover`] – tile-by-tile route walking for the built-in mover
//! - [`soundcursor`] – per-cycle record of frames that already played a sound
//! - [`sprite`] – sheet cell selection and draw parameters for the renderer

pub mod animation;
pub mod animator;
pub mod character;
pub mod gridmover;
pub mod soundcursor;
pub mod sprite;
