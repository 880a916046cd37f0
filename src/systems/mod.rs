//! Animator systems and script hooks.
//!
//! Submodules overview
//! - [`actions`] – `PlayAction` / `StopAction` hooks and the movement-lock query
//! - [`animation`] – advance every Memao sprite by one tick
//! - [`audio`] – forward sound-effect commands to the host backend
//! - [`framesound`] – emit sound effects on configured animation frames
//! - [`movement`] – built-in grid mover and follower dash sync
//! - [`spriteswap`] – attach or detach animators when a graphic changes
//! - [`waitmode`] – interpreter poll for waited actions

pub mod actions;
pub mod animation;
pub mod audio;
pub mod framesound;
pub mod movement;
pub mod spriteswap;
pub mod waitmode;
