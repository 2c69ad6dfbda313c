//! Preference store - learned per-user aliases.
//!
//! Maps a recognized category noun ("browser") to a learned value
//! ("microsoft edge"). The category set is fixed and compiled in: a
//! learning directive naming an unknown category is rejected, never
//! silently stored. Last write wins; no value history is kept.
//!
//! Persistence is a flat JSON object under the data directory, flushed
//! after every mutation. A missing or corrupt file loads as an empty
//! store - startup never fails on preference state.

use crate::error::AprilError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The fixed set of categories APRIL will learn aliases for.
pub const RECOGNIZED_CATEGORIES: &[&str] = &["browser", "editor", "terminal", "music"];

/// Check whether a category noun is in the recognized set.
pub fn is_recognized_category(category: &str) -> bool {
    let normalized = category.trim().to_lowercase();
    RECOGNIZED_CATEGORIES.contains(&normalized.as_str())
}

/// Learned category -> value mappings with flush-on-set persistence.
#[derive(Debug)]
pub struct PreferenceStore {
    entries: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl PreferenceStore {
    /// An empty in-memory store with no backing file (tests, dry runs).
    pub fn in_memory() -> Self {
        Self {
            entries: BTreeMap::new(),
            path: None,
        }
    }

    /// Load the store from a JSON file. Missing or corrupt content falls
    /// back to an empty store; entries with unrecognized categories are
    /// dropped on load.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(loaded) => loaded
                    .into_iter()
                    .filter(|(category, _)| {
                        let ok = is_recognized_category(category);
                        if !ok {
                            warn!("dropping unrecognized preference category: {}", category);
                        }
                        ok
                    })
                    .collect(),
                Err(e) => {
                    warn!("preference file corrupt, starting empty: {}", e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            entries,
            path: Some(path.to_path_buf()),
        }
    }

    /// Current learned value for a category, if any.
    pub fn get(&self, category: &str) -> Option<&str> {
        let normalized = category.trim().to_lowercase();
        self.entries.get(&normalized).map(|v| v.as_str())
    }

    /// Learn (or relearn) a category value. Rejects unrecognized
    /// categories without mutating the store. The new value is flushed to
    /// disk before returning.
    pub fn set(&mut self, category: &str, value: &str) -> Result<(), AprilError> {
        let normalized_category = category.trim().to_lowercase();
        let normalized_value = value.trim().to_lowercase();

        if !is_recognized_category(&normalized_category) {
            return Err(AprilError::UnknownCategory(normalized_category));
        }
        if normalized_value.is_empty() {
            return Err(AprilError::Store("empty preference value".to_string()));
        }

        debug!("learning preference: {} -> {}", normalized_category, normalized_value);
        self.entries.insert(normalized_category, normalized_value);
        self.persist();
        Ok(())
    }

    /// Write the store to its backing file. A flush failure is logged and
    /// the in-memory state stays authoritative for the session.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("could not create preference directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("preference flush failed: {}", e);
                }
            }
            Err(e) => warn!("preference serialization failed: {}", e),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_round_trip() {
        let mut store = PreferenceStore::in_memory();
        store.set("browser", "firefox").unwrap();
        assert_eq!(store.get("browser"), Some("firefox"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = PreferenceStore::in_memory();
        store.set("editor", "vim").unwrap();
        store.set("editor", "code").unwrap();
        assert_eq!(store.get("editor"), Some("code"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_category_rejected_store_unchanged() {
        let mut store = PreferenceStore::in_memory();
        let err = store.set("spaceship", "falcon").unwrap_err();
        assert!(matches!(err, AprilError::UnknownCategory(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_and_values_normalized() {
        let mut store = PreferenceStore::in_memory();
        store.set("  Browser ", " Microsoft Edge ").unwrap();
        assert_eq!(store.get("BROWSER"), Some("microsoft edge"));
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = PreferenceStore::load(&path);
        store.set("browser", "chrome").unwrap();
        store.set("terminal", "alacritty").unwrap();

        let reloaded = PreferenceStore::load(&path);
        assert_eq!(reloaded.get("browser"), Some("chrome"));
        assert_eq!(reloaded.get("terminal"), Some("alacritty"));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let store = PreferenceStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unrecognized_categories_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"browser": "chrome", "spaceship": "falcon"}"#).unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.get("browser"), Some("chrome"));
        assert_eq!(store.get("spaceship"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = PreferenceStore::load(Path::new("/nonexistent/preferences.json"));
        assert!(store.is_empty());
    }
}
