//! Game settings and preferences
//!
//! Persisted as one JSON blob in the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, load_json, save_json};

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Colorful obstacles over light blue windows
    #[default]
    Light,
    /// Muted palette over dark windows
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "LIGHT",
            Theme::Dark => "DARK",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Color theme
    #[serde(default)]
    pub theme: Theme,
}

impl Settings {
    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json(store, keys::SETTINGS) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        save_json(store, keys::SETTINGS, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_theme_names() {
        assert_eq!(Theme::from_str("DARK"), Some(Theme::Dark));
        assert_eq!(Theme::from_str("light"), Some(Theme::Light));
        assert_eq!(Theme::from_str("sepia"), None);
        assert_eq!(Theme::Dark.as_str(), "DARK");
    }

    #[test]
    fn test_settings_persist() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let settings = Settings { theme: Theme::Dark };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store).theme, Theme::Dark);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(keys::SETTINGS, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());

        // Unknown/missing fields fall back per field
        store.set(keys::SETTINGS, "{}");
        assert_eq!(Settings::load(&store).theme, Theme::Light);
    }
}
