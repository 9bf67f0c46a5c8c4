//! Skyhop - a single-screen reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle cycling, collisions, session)
//! - `platform`: Headless and browser implementations of the renderer/HUD
//! - `highscores`: Persisted best score
//! - `settings`: Data-driven game balance and key bindings

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreStore, MemoryHighScoreStore};
pub use settings::Settings;
pub use sim::{Directive, Game, GameEvent};

/// Game configuration constants
pub mod consts {
    /// Time from jump to returning to the jump origin (seconds)
    pub const JUMP_DURATION: f32 = 0.5;
    /// Apex of a jump as a fraction of playfield height
    pub const JUMP_HEIGHT_FRACTION: f32 = 0.2;
    /// Gap height as a fraction of playfield height
    pub const GAP_FRACTION: f32 = 1.0 / 3.0;
    /// Seconds for an obstacle to scroll across the whole playfield
    pub const CROSSING_SECS: f32 = 2.5;
    /// Delay after a collision before restart input is accepted (ms)
    pub const RESTART_DELAY_MS: u32 = 600;

    /// Smallest playfield width/height used for derived constants
    pub const MIN_PLAYFIELD_EXTENT: f32 = 1.0;
    /// Smallest jump duration used for derived constants
    pub const MIN_JUMP_DURATION: f32 = 0.05;
}
