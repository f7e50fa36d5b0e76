// Theme settings snapshot
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::ConfigStore;

pub const DEFAULT_THEME: &str = "Silhouette";

/// Options read from the config store at each refresh point.
///
/// The orchestrator keeps one snapshot and replaces it as a whole, so readers
/// never see a half-applied reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub theme: String,
    /// Master switch for all sounds
    pub sound_effect: bool,
    pub start_effect: bool,
    pub review_effect: bool,
    pub congrats_effect: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            sound_effect: true,
            start_effect: true,
            review_effect: true,
            congrats_effect: true,
        }
    }
}

impl ThemeConfig {
    /// Build a snapshot from the store, falling back to defaults for keys that
    /// are missing or hold the wrong type
    pub fn from_store(store: &dyn ConfigStore) -> Self {
        let defaults = Self::default();
        Self {
            theme: read_string(store, "theme", defaults.theme),
            sound_effect: read_bool(store, "sound_effect", defaults.sound_effect),
            start_effect: read_bool(store, "start_effect", defaults.start_effect),
            review_effect: read_bool(store, "review_effect", defaults.review_effect),
            congrats_effect: read_bool(store, "congrats_effect", defaults.congrats_effect),
        }
    }
}

fn read_bool(store: &dyn ConfigStore, key: &str, default: bool) -> bool {
    match store.get(key) {
        Some(Value::Bool(value)) => value,
        Some(other) => {
            log::warn!("[Config] Expected boolean for '{}', got {}", key, other);
            default
        }
        None => default,
    }
}

fn read_string(store: &dyn ConfigStore, key: &str, default: String) -> String {
    match store.get(key) {
        Some(Value::String(value)) if !value.is_empty() => value,
        Some(other) => {
            log::warn!("[Config] Expected non-empty string for '{}', got {}", key, other);
            default
        }
        None => default,
    }
}
