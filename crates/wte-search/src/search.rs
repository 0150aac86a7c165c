#![forbid(unsafe_code)]

//! Cursor-relative substring search.
//!
//! [`SearchEngine`] scans the live buffer forward or backward from a resume
//! position derived from the caret, selects the hit and remembers where it
//! was so the next step moves past it.
//!
//! # Resume rules
//!
//! | Step | Resume position | Scanned text |
//! |------|-----------------|--------------|
//! | forward | anchor, +1 if the anchor is the last match start | `text[resume..]` |
//! | backward | caret, -1 if a selection is present | `text[..resume]` |
//!
//! Neither direction wraps around the buffer boundary.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Blank pattern | `Skipped`, no status, nothing changes |
//! | No match | `NotFound`, "Unable to find" status, buffer and cursor untouched |
//!
//! # Example
//! ```
//! use wte_search::{SearchEngine, SearchHost, SearchOutcome, SearchSettings};
//! use wte_text::TextBuffer;
//!
//! struct Quiet;
//! impl SearchHost for Quiet {
//!     fn notify_status(&mut self, _message: &str) {}
//! }
//!
//! let mut buf = TextBuffer::with_text("one two one");
//! let mut finder = SearchEngine::new(SearchSettings::new("one"));
//! let first = finder.find_forward(&mut buf, &mut Quiet).unwrap();
//! assert_eq!(first, SearchOutcome::Found { start: 0, end: 3 });
//! let second = finder.find_forward(&mut buf, &mut Quiet).unwrap();
//! assert_eq!(second.start(), Some(8));
//! assert_eq!(finder.find_forward(&mut buf, &mut Quiet).unwrap(), SearchOutcome::NotFound);
//! ```

use std::borrow::Cow;

use wte_text::{BufferError, TextBuffer, fold};

use crate::host::{SearchHost, SearchOutcome, not_found_message};
use crate::settings::{Direction, SearchSettings};

/// The engine's memory of its most recent match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchCursor {
    /// Start of the last match, `None` before the first hit or after a reset.
    pub last_match_start: Option<usize>,
}

/// Forward/backward substring search over a [`TextBuffer`].
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    settings: SearchSettings,
    cursor: SearchCursor,
}

impl SearchEngine {
    /// Create an engine with the given settings and a fresh cursor.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            cursor: SearchCursor::default(),
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Mutable settings.
    pub fn settings_mut(&mut self) -> &mut SearchSettings {
        &mut self.settings
    }

    /// Replace the settings; the cursor is kept.
    pub fn set_settings(&mut self, settings: SearchSettings) {
        self.settings = settings;
    }

    /// Current cursor.
    #[must_use]
    pub fn cursor(&self) -> SearchCursor {
        self.cursor
    }

    /// Forget the last match. Call whenever the buffer is replaced wholesale.
    pub fn reset_position(&mut self) {
        self.cursor = SearchCursor::default();
    }

    /// Persist pattern and case rule, then step in the configured direction.
    pub fn find(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        self.settings.persist_search(host);
        self.find_in(self.settings.direction, buffer, host)
    }

    /// Step in an explicit direction without persisting anything.
    pub fn find_in(
        &mut self,
        direction: Direction,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        match direction {
            Direction::Forward => self.find_forward(buffer, host),
            Direction::Backward => self.find_back(buffer, host),
        }
    }

    /// Find the next match at or after the resume position.
    pub fn find_forward(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        if self.settings.is_blank() {
            return Ok(SearchOutcome::Skipped);
        }
        let anchor = buffer.anchor();
        let resume = if self.cursor.last_match_start == Some(anchor) {
            anchor + 1
        } else {
            anchor
        };

        let text = buffer.text();
        let (haystack, needle) = self.prepare(&text);
        let hit = scan_forward(&haystack, &needle, resume);
        self.show_result(hit, buffer, host)
    }

    /// Find the closest match that ends at or before the resume position.
    pub fn find_back(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        if self.settings.is_blank() {
            return Ok(SearchOutcome::Skipped);
        }
        let caret = buffer.caret();
        let resume = if caret != buffer.anchor() {
            caret.saturating_sub(1)
        } else {
            caret
        };

        let text = buffer.text();
        let (haystack, needle) = self.prepare(&text);
        let hit = scan_backward(&haystack, &needle, resume);
        self.show_result(hit, buffer, host)
    }

    /// Apply the case rule to both sides of the comparison.
    fn prepare<'a>(&'a self, text: &'a str) -> (Cow<'a, str>, Cow<'a, str>) {
        if self.settings.case_sensitive {
            (Cow::Borrowed(text), Cow::Borrowed(self.settings.pattern.as_str()))
        } else {
            (
                Cow::Owned(fold::fold(text)),
                Cow::Owned(fold::fold(&self.settings.pattern)),
            )
        }
    }

    fn show_result(
        &mut self,
        hit: Option<usize>,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        let Some(start) = hit else {
            tracing::debug!(pattern_len = self.settings.pattern_len(), "search miss");
            host.notify_status(&not_found_message(&self.settings.pattern));
            return Ok(SearchOutcome::NotFound);
        };

        // Folding keeps char counts, so the original pattern length applies.
        let end = start + self.settings.pattern_len();
        buffer.select(start, end)?;
        self.cursor.last_match_start = Some(start);
        tracing::debug!(start, end, "search hit");
        host.notify_status("");
        host.scroll_into_view(start);
        Ok(SearchOutcome::Found { start, end })
    }
}

/// Character index of the first `needle` occurrence at or after `from`.
///
/// Returns `None` when `from` lies past the end of `haystack`.
#[must_use]
pub fn scan_forward(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let from_byte = char_to_byte(haystack, from)?;
    let rel = haystack[from_byte..].find(needle)?;
    Some(from + haystack[from_byte..from_byte + rel].chars().count())
}

/// Character index of the last `needle` occurrence lying entirely inside
/// `haystack[..end]`.
#[must_use]
pub fn scan_backward(haystack: &str, needle: &str, end: usize) -> Option<usize> {
    let end_byte = char_to_byte(haystack, end)?;
    let hit = haystack[..end_byte].rfind(needle)?;
    Some(haystack[..hit].chars().count())
}

fn char_to_byte(s: &str, char_idx: usize) -> Option<usize> {
    match s.char_indices().nth(char_idx) {
        Some((byte, _)) => Some(byte),
        None if s.chars().count() == char_idx => Some(s.len()),
        None => None,
    }
}
