#![forbid(unsafe_code)]

//! Conditional replacement on top of [`SearchEngine`].
//!
//! A replace step only rewrites the selection when it still holds the
//! pattern; otherwise it behaves like a find step so repeated invocations
//! walk from candidate to candidate.

use wte_text::{BufferError, TextBuffer, fold};

use crate::host::{SearchHost, SearchOutcome};
use crate::search::{SearchCursor, SearchEngine};
use crate::settings::{Direction, SearchSettings};

/// Result of [`ReplaceEngine::replace_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The selection was replaced; the replacement starts at `start`.
    Replaced { start: usize },
    /// The selection did not match, so a find step ran instead.
    Searched(SearchOutcome),
}

/// Replace engine with its own search cursor.
#[derive(Debug, Clone, Default)]
pub struct ReplaceEngine {
    search: SearchEngine,
}

impl ReplaceEngine {
    /// Create an engine with the given settings and a fresh cursor.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            search: SearchEngine::new(settings),
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        self.search.settings()
    }

    /// Mutable settings.
    pub fn settings_mut(&mut self) -> &mut SearchSettings {
        self.search.settings_mut()
    }

    /// Replace the settings; the cursor is kept.
    pub fn set_settings(&mut self, settings: SearchSettings) {
        self.search.set_settings(settings);
    }

    /// Current cursor.
    #[must_use]
    pub fn cursor(&self) -> SearchCursor {
        self.search.cursor()
    }

    /// Forget the last match.
    pub fn reset_position(&mut self) {
        self.search.reset_position();
    }

    /// Whether the selection holds exactly the pattern under the case rule.
    ///
    /// Compares the raw selection with the raw pattern, not folded copies.
    #[must_use]
    pub fn matches_current_selection(&self, buffer: &TextBuffer) -> bool {
        let Some(selected) = buffer.selected_text() else {
            return false;
        };
        let settings = self.search.settings();
        if settings.case_sensitive {
            selected == settings.pattern
        } else {
            fold::eq_ignore_case(&selected, &settings.pattern)
        }
    }

    /// Persist all settings, then step in the configured direction.
    pub fn find(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        self.search.settings().persist(host);
        self.step(buffer, host)
    }

    /// Replace the selection if it matches, otherwise move to the next
    /// candidate.
    ///
    /// After a replacement the selection spans the pattern's length from the
    /// replacement start, which need not cover the inserted text.
    pub fn replace_one(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<ReplaceOutcome, BufferError> {
        self.search.settings().persist(host);
        if self.search.settings().is_blank() {
            return Ok(ReplaceOutcome::Searched(SearchOutcome::Skipped));
        }
        if !self.matches_current_selection(buffer) {
            return self.step(buffer, host).map(ReplaceOutcome::Searched);
        }

        let start = self.replace_selection(buffer);
        let end = (start + self.search.settings().pattern_len()).min(buffer.len_chars());
        buffer.select(start, end)?;
        Ok(ReplaceOutcome::Replaced { start })
    }

    /// Replace every match from the selection onward in the configured
    /// direction. Returns the number of replacements.
    ///
    /// Each pass resumes past the text it just inserted (forward) or before
    /// it (backward), so a replacement containing the pattern is never
    /// rescanned.
    pub fn replace_all(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<usize, BufferError> {
        self.search.settings().persist(host);
        if self.search.settings().is_blank() {
            return Ok(0);
        }
        let direction = self.search.settings().direction;

        let mut matched = self.matches_current_selection(buffer);
        if !matched {
            matched = self.step(buffer, host)?.is_found();
        }

        let mut count = 0;
        while matched {
            let start = self.replace_selection(buffer);
            if direction == Direction::Backward {
                buffer.set_caret(start)?;
            }
            self.search.reset_position();
            count += 1;
            matched = self.step(buffer, host)?.is_found();
        }

        tracing::debug!(count, ?direction, "replace all finished");
        Ok(count)
    }

    fn step(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        let direction = self.search.settings().direction;
        self.search.find_in(direction, buffer, host)
    }

    /// Swap the selection for the replacement text and return its start.
    fn replace_selection(&self, buffer: &mut TextBuffer) -> usize {
        let (start, _) = buffer.selection_range();
        buffer.replace_selection(&self.search.settings().replacement);
        start
    }
}
