#![forbid(unsafe_code)]

//! Key/value configuration file.
//!
//! [`PropertyStore`] keeps string properties in memory and persists them as a
//! flat JSON object. Reading is forgiving: a missing file is an empty store
//! and a corrupt one is logged and replaced with an empty store, so a broken
//! configuration never stops the editor from starting. Writes go to a
//! sibling temp file that is renamed over the target.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wte_search::SettingsStore;

/// Errors from reading or writing a [`PropertyStore`] file.
#[derive(Debug)]
pub enum StoreError {
    /// The file could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// The file is not a JSON object of strings.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "settings file {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "settings file {} is malformed: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// On-disk shape: a flat, key-sorted JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct Properties(BTreeMap<String, String>);

/// String properties with optional file backing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    path: Option<PathBuf>,
    values: Properties,
}

impl PropertyStore {
    /// An empty store that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// An empty store that saves to `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            values: Properties::default(),
        }
    }

    /// Load `path`, falling back to an empty store on any error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load_strict(&path) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable settings file");
                Self::at(path)
            }
        }
    }

    /// Load `path`. A missing file is an empty store; anything else that
    /// goes wrong is an error.
    pub fn load_strict(path: &Path) -> Result<Self, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file yet");
                return Ok(Self::at(path));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let values = serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Write to the backing file. In-memory stores succeed without writing.
    pub fn save(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Write pretty JSON to `path` via a temp file and rename.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(&self.values).map_err(|source| {
            StoreError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(io_err)?;
        tracing::debug!(path = %path.display(), keys = self.values.0.len(), "settings saved");
        Ok(())
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when unset.
    #[must_use]
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.0.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its old value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.0.remove(key)
    }

    /// Boolean stored as `TRUE`/`FALSE` (read case-insensitively). Any other
    /// stored value reads as `false`.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .map_or(default, |v| v.eq_ignore_ascii_case("TRUE"))
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "TRUE" } else { "FALSE" });
    }

    /// Integer value; unparsable values fall back to `default`.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key).map(str::parse::<i64>) {
            Some(Ok(v)) => v,
            Some(Err(_)) => {
                tracing::warn!(key, "ignoring non-numeric setting");
                default
            }
            None => default,
        }
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, value.to_string());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl SettingsStore for PropertyStore {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let store = PropertyStore::load_strict(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = PropertyStore::at(&path);
        store.set("Pattern", "needle");
        store.set_bool("CaseSensitive", true);
        store.set_int("Width", 80);
        store.save().unwrap();

        assert!(!dir.path().join("settings.json.tmp").exists());
        let loaded = PropertyStore::load(&path);
        assert_eq!(loaded, store);
        assert_eq!(loaded.get("CaseSensitive"), Some("TRUE"));
        assert_eq!(loaded.get_int("Width", 0), 80);
    }

    #[test]
    fn saved_file_is_a_flat_json_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = PropertyStore::at(&path);
        store.set("b", "2");
        store.set("a", "1");
        store.save().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, serde_json::json!({ "a": "1", "b": "2" }));
    }

    #[test]
    #[traced_test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PropertyStore::load_strict(&path),
            Err(StoreError::Parse { .. })
        ));
        let store = PropertyStore::load(&path);
        assert!(store.is_empty());
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(logs_contain("ignoring unreadable settings file"));
    }

    #[test]
    fn non_string_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "Width": 80 }"#).unwrap();
        assert!(PropertyStore::load_strict(&path).is_err());
    }

    #[test]
    fn typed_getters_fall_back_to_defaults() {
        let mut store = PropertyStore::in_memory();
        assert!(store.get_bool("Flag", true));
        assert_eq!(store.get_int("Count", 7), 7);
        assert_eq!(store.get_or("Name", "none"), "none");

        store.set("Flag", "true");
        store.set("Count", "many");
        assert!(store.get_bool("Flag", false));
        assert_eq!(store.get_int("Count", 7), 7);

        store.set("Flag", "yes");
        assert!(!store.get_bool("Flag", true));
    }

    #[test]
    fn in_memory_store_saves_nowhere() {
        let mut store = PropertyStore::in_memory();
        store.set("k", "v");
        assert!(store.save().is_ok());
        assert_eq!(store.remove("k").as_deref(), Some("v"));
        assert!(store.is_empty());
    }

    #[test]
    fn settings_store_view() {
        let mut store = PropertyStore::in_memory();
        store.set("Pattern", "x");
        let view: &dyn SettingsStore = &store;
        assert_eq!(view.get_setting("Pattern").as_deref(), Some("x"));
        assert_eq!(view.get_setting("Replacer"), None);
    }

    #[test]
    fn io_error_reports_path() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing-dir").join("settings.json");
        let err = PropertyStore::at(&target).save().unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("settings.json"));
    }
}
