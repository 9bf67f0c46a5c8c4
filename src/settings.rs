//! Game settings and key bindings
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable game balance and controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Time for a jump to return to its origin (seconds)
    pub jump_duration_secs: f32,
    /// Gap height as a fraction of playfield height, in (0, 1]
    pub gap_fraction: f32,
    /// Seconds for an obstacle to cross the playfield
    pub crossing_secs: f32,
    /// Debounce between a collision and accepting restart input (ms)
    pub restart_delay_ms: u32,
    /// `KeyboardEvent.key` values that request a jump
    pub jump_keys: Vec<String>,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jump_duration_secs: JUMP_DURATION,
            gap_fraction: GAP_FRACTION,
            crossing_secs: CROSSING_SECS,
            restart_delay_ms: RESTART_DELAY_MS,
            jump_keys: default_jump_keys(),
            seed: None,
        }
    }
}

fn default_jump_keys() -> Vec<String> {
    [" ", "ArrowUp", "w", "W"].iter().map(|k| k.to_string()).collect()
}

/// Upper bound for the restart debounce
const MAX_RESTART_DELAY_MS: u32 = 10_000;

impl Settings {
    /// Clamp every field into a range the simulation can use
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.jump_duration_secs.is_finite() {
            self.jump_duration_secs = defaults.jump_duration_secs;
        }
        self.jump_duration_secs = self.jump_duration_secs.max(MIN_JUMP_DURATION);

        if !self.gap_fraction.is_finite() || self.gap_fraction <= 0.0 {
            self.gap_fraction = defaults.gap_fraction;
        }
        self.gap_fraction = self.gap_fraction.min(1.0);

        if !self.crossing_secs.is_finite() || self.crossing_secs <= 0.0 {
            self.crossing_secs = defaults.crossing_secs;
        }

        self.restart_delay_ms = self.restart_delay_ms.min(MAX_RESTART_DELAY_MS);

        self.jump_keys.retain(|k| !k.is_empty());
        if self.jump_keys.is_empty() {
            self.jump_keys = defaults.jump_keys;
        }
        self
    }

    pub fn is_jump_key(&self, key: &str) -> bool {
        self.jump_keys.iter().any(|k| k == key)
    }

    /// Parse stored JSON, falling back to defaults for anything unreadable
    pub fn from_json(json: &str) -> Self {
        Self::from_stored(json).0
    }

    /// Like `from_json`; the flag is set when the stored value was
    /// unreadable or had to be clamped and should be written back
    pub fn from_stored(json: &str) -> (Self, bool) {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => {
                let sanitized = settings.clone().sanitized();
                let repaired = sanitized != settings;
                (sanitized, repaired)
            }
            Err(err) => {
                log::warn!("Ignoring stored settings: {}", err);
                (Self::default(), true)
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyhop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                let (settings, repaired) = Self::from_stored(&json);
                if repaired {
                    settings.save();
                }
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(err) => log::warn!("Failed to save settings: {:?}", err),
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
