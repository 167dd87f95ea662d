//! High score leaderboards
//!
//! One top 10 list per game mode, persisted as a JSON array of
//! `{name, score, timestamp}` in the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, ranking_key, save_json};
use crate::sim::GameMode;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player display name
    pub name: String,
    /// Distance (Mission) or points (Challenge)
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard for one mode, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a score, keep the list sorted descending and trimmed to the top 10.
    /// Ties rank below existing entries. Returns the rank achieved (1-indexed),
    /// or None if the entry fell off the end.
    pub fn add_score(&mut self, name: &str, score: u64, timestamp: f64) -> Option<usize> {
        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a mode's leaderboard; absent or corrupt data is an empty list
    pub fn load(store: &impl KeyValueStore, mode: GameMode) -> Self {
        match load_json::<HighScores>(store, &ranking_key(mode)) {
            Some(mut scores) => {
                // Stored data may come from an older build or hand edits
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} {} high scores", scores.len(), mode.as_str());
                scores
            }
            None => Self::new(),
        }
    }

    /// Save a mode's leaderboard
    pub fn save(&self, store: &mut impl KeyValueStore, mode: GameMode) {
        save_json(store, &ranking_key(mode), self);
        log::info!(
            "{} high scores saved ({} entries)",
            mode.as_str(),
            self.entries.len()
        );
    }

    /// Load, insert, save. Returns the rank achieved.
    pub fn record(
        store: &mut impl KeyValueStore,
        mode: GameMode,
        name: &str,
        score: u64,
        timestamp: f64,
    ) -> Option<usize> {
        let mut scores = Self::load(store, mode);
        let rank = scores.add_score(name, score, timestamp);
        scores.save(store, mode);
        rank
    }
}

/// Format a mode's score for the ranking list
pub fn format_score(mode: GameMode, score: u64) -> String {
    match mode {
        GameMode::Mission => format!("{}m", score),
        GameMode::Challenge => score.to_string(),
    }
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            calendar_date(timestamp)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

/// Local calendar date as M/D/YY
#[cfg(target_arch = "wasm32")]
fn calendar_date(timestamp: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    format!(
        "{}/{}/{:02}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year() % 100
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn calendar_date(_timestamp: f64) -> String {
    "N/A".to_string()
}
