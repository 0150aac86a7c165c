//! Persisted search/replace settings.
//!
//! Settings travel as plain key/value strings so any configuration backend
//! can hold them. Booleans are stored as `TRUE`/`FALSE` and read back
//! case-insensitively.

use crate::host::SearchHost;

/// Configuration key for the search pattern.
pub const KEY_PATTERN: &str = "Pattern";
/// Configuration key for the replacement text.
pub const KEY_REPLACEMENT: &str = "Replacer";
/// Configuration key for case sensitivity.
pub const KEY_CASE_SENSITIVE: &str = "CaseSensitive";

/// Read access to a key/value configuration store.
pub trait SettingsStore {
    /// Look up a stored value.
    fn get_setting(&self, key: &str) -> Option<String>;
}

/// Scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Search pattern, replacement text, case rule and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSettings {
    /// Text to look for. Blank patterns disable searching.
    pub pattern: String,
    /// Replacement text (replace engine only).
    pub replacement: String,
    /// Exact comparison when `true`, case-folded otherwise.
    pub case_sensitive: bool,
    /// Scan direction.
    pub direction: Direction,
}

impl SearchSettings {
    /// Settings for `pattern` with everything else at its default.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Builder: set the replacement text.
    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    /// Builder: set case sensitivity.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Builder: set the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Seed settings from a configuration store.
    ///
    /// Missing keys fall back to an empty pattern and replacement, a
    /// case-insensitive rule and forward direction.
    #[must_use]
    pub fn load(store: &dyn SettingsStore) -> Self {
        Self {
            pattern: store.get_setting(KEY_PATTERN).unwrap_or_default(),
            replacement: store.get_setting(KEY_REPLACEMENT).unwrap_or_default(),
            case_sensitive: store
                .get_setting(KEY_CASE_SENSITIVE)
                .is_some_and(|v| v.eq_ignore_ascii_case("TRUE")),
            direction: Direction::Forward,
        }
    }

    /// Whether the pattern is blank (empty after trimming whitespace).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pattern.trim().is_empty()
    }

    /// Pattern length in characters.
    #[must_use]
    pub fn pattern_len(&self) -> usize {
        self.pattern.chars().count()
    }

    /// Write pattern and case rule through the host.
    pub fn persist_search(&self, host: &mut dyn SearchHost) {
        host.store_setting(KEY_PATTERN, &self.pattern);
        host.store_setting(KEY_CASE_SENSITIVE, bool_value(self.case_sensitive));
    }

    /// Write pattern, replacement and case rule through the host.
    pub fn persist(&self, host: &mut dyn SearchHost) {
        self.persist_search(host);
        host.store_setting(KEY_REPLACEMENT, &self.replacement);
    }
}

fn bool_value(b: bool) -> &'static str {
    if b { "TRUE" } else { "FALSE" }
}
