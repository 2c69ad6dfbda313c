//! APRIL configuration.
//!
//! Configuration lives in ~/.config/april/config.toml; runtime data
//! (preferences, action history) lives in ~/.local/share/april.
//! Missing or corrupt config falls back to defaults - never fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_DIR: &str = "april";
const CONFIG_FILE: &str = "config.toml";
const DATA_DIR: &str = "april";

/// Preference store file name under the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";
/// Action history file name under the data directory.
pub const HISTORY_FILE: &str = "action_history.json";

/// Pattern detection settings.
///
/// The detection window and threshold are configuration, not constants:
/// how aggressive proactive suggestions should be is a per-install choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionSettings {
    /// How many recent executed actions to scan (valid: 2-100)
    #[serde(default = "default_suggestion_window")]
    pub window: usize,

    /// How many repeats within the window trigger a suggestion (valid: 2-window)
    #[serde(default = "default_suggestion_threshold")]
    pub threshold: usize,
}

fn default_suggestion_window() -> usize {
    10
}

fn default_suggestion_threshold() -> usize {
    3
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            window: default_suggestion_window(),
            threshold: default_suggestion_threshold(),
        }
    }
}

/// Top-level assistant configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub suggestions: SuggestionSettings,

    /// Override for the runtime data directory (tests, portable installs)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl AssistantConfig {
    /// Load configuration from the given file, falling back to defaults on
    /// any failure. Out-of-range values are clamped, not rejected.
    pub fn load(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<AssistantConfig>(&raw) {
                Ok(config) => config,
                Err(e) => {
                    warn!("config parse failed ({}), using defaults: {}", path.display(), e);
                    AssistantConfig::default()
                }
            },
            Err(_) => AssistantConfig::default(),
        };
        config.validate();
        config
    }

    /// Load from the default per-user config path.
    pub fn load_default() -> Self {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => AssistantConfig::default(),
        }
    }

    /// Clamp settings to valid ranges.
    fn validate(&mut self) {
        self.suggestions.window = self.suggestions.window.clamp(2, 100);
        self.suggestions.threshold = self
            .suggestions
            .threshold
            .clamp(2, self.suggestions.window);
    }

    /// Resolve the runtime data directory.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join(DATA_DIR))
            .unwrap_or_else(|| PathBuf::from(".").join(DATA_DIR))
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir().join(PREFERENCES_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join(HISTORY_FILE)
    }
}

/// Default per-user config file path.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}
