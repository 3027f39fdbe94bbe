//! Client-local persisted state
//!
//! The best score seen on this device and the last player name, kept in a
//! key/value store shaped like browser local storage.

use std::collections::HashMap;

use thiserror::Error;

const HIGH_SCORE_KEY: &str = "highScore";
const PLAYER_NAME_KEY: &str = "playerName";

/// Write failure from a key/value backend (quota exceeded, storage disabled)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// String key/value storage
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed view over the client's local storage
#[derive(Debug, Clone, Default)]
pub struct LocalPrefs<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> LocalPrefs<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored best score; missing or unparsable values read as 0
    pub fn high_score(&self) -> u32 {
        self.storage
            .get_item(HIGH_SCORE_KEY)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn set_high_score(&mut self, score: u32) {
        if let Err(e) = self.storage.set_item(HIGH_SCORE_KEY, &score.to_string()) {
            tracing::warn!("Failed to persist high score {}: {}", score, e);
        }
    }

    pub fn player_name(&self) -> String {
        self.storage.get_item(PLAYER_NAME_KEY).unwrap_or_default()
    }

    pub fn set_player_name(&mut self, name: &str) {
        if let Err(e) = self.storage.set_item(PLAYER_NAME_KEY, name) {
            tracing::warn!("Failed to persist player name: {}", e);
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
