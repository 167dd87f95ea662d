//! Key-value persistence
//!
//! Everything the game remembers between sessions is a string under a fixed key:
//! - LocalStorage on web
//! - An in-memory map natively and in tests
//!
//! Absent or corrupt values read as "no data"; callers fall back to defaults.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

use crate::sim::GameMode;

/// Storage keys
pub mod keys {
    pub const BEST_CHALLENGE_SCORE: &str = "sky_climber_challenge_best";
    pub const PLAYER_NAME: &str = "sky_climber_player_name";
    pub const SETTINGS: &str = "sky_climber_settings";
    /// Prefix of the per-mode leaderboard keys (`ranking_MISSION`, `ranking_CHALLENGE`)
    pub const RANKING_PREFIX: &str = "ranking_";
}

/// Leaderboard key for a mode
pub fn ranking_key(mode: GameMode) -> String {
    format!("{}{}", keys::RANKING_PREFIX, mode.as_str())
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store backed by a HashMap
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Read and decode a JSON value; missing or corrupt data yields None
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt data under {}: {}", key, e);
            None
        }
    }
}

/// Encode and store a JSON value
pub fn save_json<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Failed to encode {}: {}", key, e),
    }
}
