#![forbid(unsafe_code)]

//! Toolkit-neutral find/replace dialog controller.
//!
//! [`SearchDialog`] owns the dialog's form state (the values a user edits
//! before pressing a button) and forwards button presses to an injected
//! [`DialogActions`] implementation. Both engines implement the trait, so the
//! same controller drives a Find dialog and a Replace dialog.

use wte_text::{BufferError, TextBuffer};

use crate::host::{SearchHost, SearchOutcome};
use crate::replace::{ReplaceEngine, ReplaceOutcome};
use crate::search::SearchEngine;
use crate::settings::{Direction, SearchSettings};

/// A dialog button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogCommand {
    Find,
    Replace,
    ReplaceAll,
}

/// What a submitted command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Search(SearchOutcome),
    Replace(ReplaceOutcome),
    ReplacedAll(usize),
    /// The actions behind this dialog do not offer the command.
    Unsupported,
    /// The dialog is closed.
    Inactive,
}

/// Algorithms a dialog can trigger.
pub trait DialogActions {
    /// Settings the algorithms run with.
    fn settings_mut(&mut self) -> &mut SearchSettings;

    /// Persist settings and run one find step.
    fn find(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError>;

    /// Replace the current match. `None` when replacing is not offered.
    fn replace(
        &mut self,
        _buffer: &mut TextBuffer,
        _host: &mut dyn SearchHost,
    ) -> Result<Option<ReplaceOutcome>, BufferError> {
        Ok(None)
    }

    /// Replace every match. `None` when replacing is not offered.
    fn replace_all(
        &mut self,
        _buffer: &mut TextBuffer,
        _host: &mut dyn SearchHost,
    ) -> Result<Option<usize>, BufferError> {
        Ok(None)
    }
}

impl DialogActions for SearchEngine {
    fn settings_mut(&mut self) -> &mut SearchSettings {
        SearchEngine::settings_mut(self)
    }

    fn find(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        SearchEngine::find(self, buffer, host)
    }
}

impl DialogActions for ReplaceEngine {
    fn settings_mut(&mut self) -> &mut SearchSettings {
        ReplaceEngine::settings_mut(self)
    }

    fn find(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<SearchOutcome, BufferError> {
        ReplaceEngine::find(self, buffer, host)
    }

    fn replace(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<Option<ReplaceOutcome>, BufferError> {
        self.replace_one(buffer, host).map(Some)
    }

    fn replace_all(
        &mut self,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<Option<usize>, BufferError> {
        ReplaceEngine::replace_all(self, buffer, host).map(Some)
    }
}

/// Dialog controller generic over the algorithms it drives.
#[derive(Debug, Clone)]
pub struct SearchDialog<A> {
    actions: A,
    form: SearchSettings,
    open: bool,
}

impl<A: DialogActions> SearchDialog<A> {
    /// Wrap `actions` in a closed dialog with an empty form.
    pub fn new(actions: A) -> Self {
        Self {
            actions,
            form: SearchSettings::default(),
            open: false,
        }
    }

    /// Show the dialog, seeding the form from `seed`.
    ///
    /// The direction always starts out forward.
    pub fn open(&mut self, seed: &SearchSettings) {
        self.form = seed.clone();
        self.form.direction = Direction::Forward;
        self.open = true;
    }

    /// Hide the dialog. The form keeps its values.
    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn form(&self) -> &SearchSettings {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SearchSettings {
        &mut self.form
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.form.pattern = pattern.into();
    }

    pub fn set_replacement(&mut self, replacement: impl Into<String>) {
        self.form.replacement = replacement.into();
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.form.case_sensitive = case_sensitive;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.form.direction = direction;
    }

    #[must_use]
    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut A {
        &mut self.actions
    }

    /// Push the form into the actions and run `command`.
    pub fn submit(
        &mut self,
        command: DialogCommand,
        buffer: &mut TextBuffer,
        host: &mut dyn SearchHost,
    ) -> Result<DialogResult, BufferError> {
        if !self.open {
            return Ok(DialogResult::Inactive);
        }
        *self.actions.settings_mut() = self.form.clone();
        let result = match command {
            DialogCommand::Find => DialogResult::Search(self.actions.find(buffer, host)?),
            DialogCommand::Replace => self
                .actions
                .replace(buffer, host)?
                .map_or(DialogResult::Unsupported, DialogResult::Replace),
            DialogCommand::ReplaceAll => self
                .actions
                .replace_all(buffer, host)?
                .map_or(DialogResult::Unsupported, DialogResult::ReplacedAll),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet;

    impl SearchHost for Quiet {
        fn notify_status(&mut self, _message: &str) {}
    }

    #[test]
    fn open_seeds_form_and_forces_forward() {
        let mut dialog = SearchDialog::new(SearchEngine::default());
        let seed = SearchSettings::new("x")
            .with_case_sensitive(true)
            .with_direction(Direction::Backward);
        dialog.open(&seed);

        assert!(dialog.is_open());
        assert_eq!(dialog.form().pattern, "x");
        assert!(dialog.form().case_sensitive);
        assert_eq!(dialog.form().direction, Direction::Forward);
    }

    #[test]
    fn closed_dialog_does_nothing() {
        let mut dialog = SearchDialog::new(SearchEngine::default());
        let mut buf = TextBuffer::with_text("abc");
        dialog.set_pattern("b");
        let result = dialog.submit(DialogCommand::Find, &mut buf, &mut Quiet).unwrap();
        assert_eq!(result, DialogResult::Inactive);
        assert!(!buf.has_selection());
    }

    #[test]
    fn find_dialog_searches_with_form_values() {
        let mut dialog = SearchDialog::new(SearchEngine::default());
        let mut buf = TextBuffer::with_text("xx ABC");
        dialog.open(&SearchSettings::default());
        dialog.set_pattern("abc");

        let result = dialog.submit(DialogCommand::Find, &mut buf, &mut Quiet).unwrap();
        assert_eq!(result, DialogResult::Search(SearchOutcome::Found { start: 3, end: 6 }));
        assert_eq!(dialog.actions().settings().pattern, "abc");
    }

    #[test]
    fn find_dialog_rejects_replace_commands() {
        let mut dialog = SearchDialog::new(SearchEngine::default());
        let mut buf = TextBuffer::with_text("abc");
        dialog.open(&SearchSettings::new("b").with_replacement("z"));

        for command in [DialogCommand::Replace, DialogCommand::ReplaceAll] {
            let result = dialog.submit(command, &mut buf, &mut Quiet).unwrap();
            assert_eq!(result, DialogResult::Unsupported);
        }
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn replace_dialog_drives_replace_engine() {
        let mut dialog = SearchDialog::new(ReplaceEngine::default());
        let mut buf = TextBuffer::with_text("one one");
        dialog.open(&SearchSettings::new("one").with_replacement("1"));

        let first = dialog.submit(DialogCommand::Replace, &mut buf, &mut Quiet).unwrap();
        assert_eq!(
            first,
            DialogResult::Replace(ReplaceOutcome::Searched(SearchOutcome::Found { start: 0, end: 3 }))
        );
        let second = dialog.submit(DialogCommand::Replace, &mut buf, &mut Quiet).unwrap();
        assert_eq!(second, DialogResult::Replace(ReplaceOutcome::Replaced { start: 0 }));

        dialog.set_direction(Direction::Forward);
        let rest = dialog.submit(DialogCommand::ReplaceAll, &mut buf, &mut Quiet).unwrap();
        assert_eq!(rest, DialogResult::ReplacedAll(1));
        assert_eq!(buf.text(), "1 1");
    }

    #[test]
    fn form_edits_do_not_leak_until_submit() {
        let mut dialog = SearchDialog::new(SearchEngine::new(SearchSettings::new("old")));
        dialog.open(&SearchSettings::new("old"));
        dialog.set_pattern("new");
        assert_eq!(dialog.actions().settings().pattern, "old");
        dialog.close();
        assert_eq!(dialog.form().pattern, "new");
    }
}
