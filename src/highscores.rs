//! Persisted best score
//!
//! Stored in LocalStorage as a bare JSON number. Anything that does not
//! parse as a non-negative integer counts as no score.

/// Durable storage for the best score
pub trait HighScoreStore {
    /// Stored high score; `None` if absent or unreadable
    fn load_high_score(&self) -> Option<u64>;

    fn save_high_score(&mut self, score: u64);
}

/// Parse a persisted value, rejecting anything non-numeric
pub fn parse_high_score(raw: &str) -> Option<u64> {
    match serde_json::from_str::<u64>(raw.trim()) {
        Ok(score) => Some(score),
        Err(err) => {
            log::warn!("Ignoring stored high score {:?}: {}", raw, err);
            None
        }
    }
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    raw: Option<String>,
    /// Number of saves performed
    pub writes: usize,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted raw value
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Some(raw.to_string()),
            writes: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load_high_score(&self) -> Option<u64> {
        self.raw.as_deref().and_then(parse_high_score)
    }

    fn save_high_score(&mut self, score: u64) {
        if let Ok(json) = serde_json::to_string(&score) {
            self.raw = Some(json);
            self.writes += 1;
        }
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageHighScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageHighScoreStore {
    const STORAGE_KEY: &'static str = "skyhop_high_score";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScoreStore {
    fn load_high_score(&self) -> Option<u64> {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score starts at 0");
            return None;
        };
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => parse_high_score(&raw),
            _ => None,
        }
    }

    fn save_high_score(&mut self, score: u64) {
        if let Some(storage) = Self::storage() {
            if let Ok(json) = serde_json::to_string(&score) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("High score saved ({})", score),
                    Err(err) => log::warn!("Failed to save high score: {:?}", err),
                }
            }
        }
    }
}
