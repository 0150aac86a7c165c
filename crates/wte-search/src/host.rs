//! The channel between the engines and the document host.
//!
//! Engines never reach for global UI state. Everything they need from the
//! outside world (scrolling, status messages, settings persistence) goes
//! through a [`SearchHost`] passed into each call.

/// Host-side effects requested by the search and replace engines.
pub trait SearchHost {
    /// Make `offset` visible. Hosts without a viewport ignore this.
    fn scroll_into_view(&mut self, _offset: usize) {}

    /// Show a transient status message; an empty message clears the slot.
    ///
    /// How long it stays visible is up to the host.
    fn notify_status(&mut self, message: &str);

    /// Persist one setting. Hosts without configuration storage ignore this.
    fn store_setting(&mut self, _key: &str, _value: &str) {}
}

/// Result of one find step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A match was selected at `[start, end)`.
    Found { start: usize, end: usize },
    /// No match before the buffer boundary.
    NotFound,
    /// The pattern was blank; nothing happened.
    Skipped,
}

impl SearchOutcome {
    /// Whether a match was selected.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Start of the selected match.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        match self {
            Self::Found { start, .. } => Some(*start),
            _ => None,
        }
    }
}

/// Status text shown when a pattern cannot be found.
#[must_use]
pub fn not_found_message(pattern: &str) -> String {
    format!("Unable to find \"{pattern}\"")
}
