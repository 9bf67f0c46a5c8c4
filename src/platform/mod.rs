//! Platform abstraction layer
//!
//! Implementations of the collaborators the simulation talks to:
//! - Rendering and HUD (DOM on web, in-memory when headless)
//! - Input events, frame callbacks and the restart timer (web only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;
