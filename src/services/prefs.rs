//! Key-value preference storage

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Preference key for the persisted dark-theme flag.
pub const DARK_THEME_KEY: &str = "dark_theme";

/// File-backed boolean preference store.
///
/// Values live in a single JSON object on disk and are written through on
/// every update. The rest of the application only ever needs
/// [`get_bool`](PreferenceStore::get_bool) and
/// [`set_bool`](PreferenceStore::set_bool).
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: Mutex<HashMap<String, bool>>,
}

impl PreferenceStore {
    /// Load the store from `path`, starting empty when the file does not
    /// exist yet. An unreadable or malformed file is an error so a bad
    /// preference file is caught at startup instead of being clobbered on
    /// the first write.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("malformed preference file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preference file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read preference file {}", path.display()))
            }
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Read a boolean preference, falling back to `default` when the key
    /// has never been written.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.lock() {
            Ok(values) => values.get(key).copied().unwrap_or(default),
            Err(e) => {
                tracing::warn!("Preference lock poisoned, using default: {}", e);
                default
            }
        }
    }

    /// Write a boolean preference through to disk.
    pub fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        let snapshot = {
            let mut values = self
                .values
                .lock()
                .map_err(|e| anyhow!("preference lock poisoned: {}", e))?;
            values.insert(key.to_string(), value);
            values.clone()
        };
        self.write(&snapshot)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, values: &HashMap<String, bool>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create preference directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write preference file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_the_callers_default() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::load(dir.path().join("settings.json")).unwrap();
        assert!(!store.get_bool(DARK_THEME_KEY, false));
        assert!(store.get_bool(DARK_THEME_KEY, true));
    }

    #[test]
    fn set_bool_round_trips_through_a_fresh_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = PreferenceStore::load(&path).unwrap();
        store.set_bool(DARK_THEME_KEY, true).unwrap();
        assert!(store.get_bool(DARK_THEME_KEY, false));

        let reopened = PreferenceStore::load(&path).unwrap();
        assert!(reopened.get_bool(DARK_THEME_KEY, false));
    }

    #[test]
    fn last_write_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = PreferenceStore::load(&path).unwrap();
        store.set_bool(DARK_THEME_KEY, true).unwrap();
        store.set_bool(DARK_THEME_KEY, false).unwrap();

        let reopened = PreferenceStore::load(&path).unwrap();
        assert!(!reopened.get_bool(DARK_THEME_KEY, true));
    }

    #[test]
    fn set_bool_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.json");

        let store = PreferenceStore::load(&path).unwrap();
        store.set_bool(DARK_THEME_KEY, true).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn malformed_file_is_rejected_at_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert!(PreferenceStore::load(&path).is_err());
    }
}
