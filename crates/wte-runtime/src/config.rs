#![forbid(unsafe_code)]

//! Editor configuration.
//!
//! Defaults can be overridden through `WTE_*` environment variables; callers
//! apply explicit command-line values on top.

use std::path::PathBuf;
use std::time::Duration;

use wte_text::HistoryConfig;

use crate::recent::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::status::DEFAULT_TTL;

/// Settings file used when nothing else is configured.
pub const DEFAULT_SETTINGS_FILE: &str = "weekendtexteditor.json";

/// Environment variable naming the settings file.
pub const ENV_SETTINGS: &str = "WTE_SETTINGS";
/// Environment variable for the recent-file capacity.
pub const ENV_RECENT: &str = "WTE_RECENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Property file holding search settings and the recent-file list.
    pub settings_path: PathBuf,
    /// Number of remembered files.
    pub recent_capacity: usize,
    /// Lifetime of status messages.
    pub status_ttl: Duration,
    /// Undo history limits.
    pub history: HistoryConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_FILE),
            recent_capacity: DEFAULT_CAPACITY,
            status_ttl: DEFAULT_TTL,
            history: HistoryConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Defaults with overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `get_env`.
    ///
    /// Unparsable or blank values are ignored.
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(val) = get_env(ENV_SETTINGS)
            && !val.trim().is_empty()
        {
            config.settings_path = PathBuf::from(val);
        }
        if let Some(val) = get_env(ENV_RECENT) {
            match val.trim().parse::<usize>() {
                Ok(n) if n > MAX_CAPACITY => {
                    tracing::warn!(value = n, max = MAX_CAPACITY, "clamping {ENV_RECENT}");
                    config.recent_capacity = MAX_CAPACITY;
                }
                Ok(n) => config.recent_capacity = n,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid {ENV_RECENT}"),
            }
        }
        config
    }

    /// Builder: set the settings file.
    #[must_use]
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    /// Builder: set the history limits.
    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }
}
