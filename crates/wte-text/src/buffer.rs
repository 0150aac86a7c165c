#![forbid(unsafe_code)]

//! Mutable text buffer with caret, selection and change tracking.
//!
//! [`TextBuffer`] combines a [`Rope`] with a [`Selection`] (anchor + caret)
//! and an embedded [`ChangeTracker`]. Every mutation hands exactly one
//! invertible [`EditRecord`] to the tracker and then notifies the optional
//! [`BufferObserver`].
//!
//! All offsets are character indices. Offsets outside `[0, len]` are
//! rejected with [`BufferError::OutOfRange`] before anything changes.
//!
//! # Example
//! ```
//! use wte_text::TextBuffer;
//!
//! let mut buf = TextBuffer::with_text("hello world");
//! buf.select(6, 11).unwrap();
//! assert_eq!(buf.selected_text().as_deref(), Some("world"));
//!
//! buf.replace_selection("there");
//! assert_eq!(buf.text(), "hello there");
//! assert!(buf.is_dirty());
//!
//! buf.undo();
//! assert_eq!(buf.text(), "hello world");
//! assert_eq!(buf.selected_text().as_deref(), Some("world"));
//! ```

use std::fmt;

use crate::edit::EditRecord;
use crate::error::{BufferError, Result};
use crate::history::{ChangeTracker, HistoryConfig, HistoryState};
use crate::rope::Rope;

/// Selection defined by an anchor (fixed, the "mark") and a head (the caret,
/// the "dot").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: usize,
    /// The moving end; always equal to the caret.
    pub head: usize,
}

impl Selection {
    /// Selection spanning `anchor..head` (either order).
    #[must_use]
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Empty selection with the caret at `pos`.
    #[must_use]
    pub const fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Ordered range `(start, end)` with `start <= end`.
    #[must_use]
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    /// Whether the selection is empty (anchor == head).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    fn clamp(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }

    fn shifted(self, record: &EditRecord) -> Self {
        Self {
            anchor: shift_offset(self.anchor, record),
            head: shift_offset(self.head, record),
        }
    }
}

/// Move an offset across an edit applied at or before it.
fn shift_offset(pos: usize, record: &EditRecord) -> usize {
    let offset = record.offset();
    let removed = record.removed_chars();
    let inserted = record.inserted_chars();

    let after_delete = if pos <= offset {
        pos
    } else if pos <= offset + removed {
        offset
    } else {
        pos - removed
    };
    if inserted > 0 && after_delete >= offset {
        after_delete + inserted
    } else {
        after_delete
    }
}

/// Persistent observer for buffer changes.
///
/// Both hooks fire after the buffer is already in its new state, so the
/// observer can re-query anything it needs.
pub trait BufferObserver {
    /// A mutation (edit, undo or redo) was applied.
    fn edited(&mut self, _record: &EditRecord) {}

    /// Undo/redo availability or the dirty flag may have changed.
    fn history_changed(&mut self, _state: HistoryState) {}
}

/// The mutable document text plus caret/selection state.
pub struct TextBuffer {
    rope: Rope,
    selection: Selection,
    tracker: ChangeTracker,
    observer: Option<Box<dyn BufferObserver + Send>>,
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("len_chars", &self.rope.len_chars())
            .field("selection", &self.selection)
            .field("tracker", &self.tracker)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Create an empty buffer with custom history limits.
    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            rope: Rope::new(),
            selection: Selection::default(),
            tracker: ChangeTracker::new(config),
            observer: None,
        }
    }

    /// Create a clean buffer holding `text`, caret at the start.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.rope.replace(text);
        buf
    }

    /// Install the change observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn BufferObserver + Send>) {
        self.observer = Some(observer);
    }

    /// Remove the change observer.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ====================================================================
    // Content
    // ====================================================================

    /// Full content as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The underlying rope.
    #[must_use]
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Length in characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whether the buffer holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Text in `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> Result<String> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end).into_owned())
    }

    // ====================================================================
    // Caret and selection
    // ====================================================================

    /// Caret offset (the selection head).
    #[must_use]
    pub fn caret(&self) -> usize {
        self.selection.head
    }

    /// Selection anchor (equals the caret when nothing is selected).
    #[must_use]
    pub fn anchor(&self) -> usize {
        self.selection.anchor
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Ordered selection range.
    #[must_use]
    pub fn selection_range(&self) -> (usize, usize) {
        self.selection.range()
    }

    /// Whether a non-empty selection exists.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected text, or `None` when the selection is empty.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        let (start, end) = self.selection.range();
        Some(self.rope.slice(start..end).into_owned())
    }

    /// Move the caret and drop any selection.
    pub fn set_caret(&mut self, offset: usize) -> Result<()> {
        self.check_offset(offset)?;
        self.selection = Selection::caret(offset);
        Ok(())
    }

    /// Set anchor and caret independently (backward selections allowed).
    pub fn set_selection(&mut self, anchor: usize, head: usize) -> Result<()> {
        self.check_offset(anchor)?;
        self.check_offset(head)?;
        self.selection = Selection::new(anchor, head);
        Ok(())
    }

    /// Select `[start, end)` with the caret at `end`.
    ///
    /// An `end` below `start` is raised to `start`.
    pub fn select(&mut self, start: usize, end: usize) -> Result<()> {
        self.set_selection(start, end.max(start))
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.rope.len_chars());
    }

    // ====================================================================
    // Mutations
    // ====================================================================

    /// Insert `text` at `offset`. Inserting empty text is a no-op.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        self.commit(EditRecord::Insert {
            offset,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Delete `[start, end)`. An empty range is a no-op.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        let text = self.rope.slice(start..end).into_owned();
        self.commit(EditRecord::Delete {
            offset: start,
            text,
        });
        Ok(())
    }

    /// Replace the selection with `text` (plain insert at the caret when the
    /// selection is empty). The selection collapses after the new text.
    pub fn replace_selection(&mut self, text: &str) {
        let (start, end) = self.selection.range();
        let removed = self.rope.slice(start..end).into_owned();
        let record = match (removed.is_empty(), text.is_empty()) {
            (true, true) => return,
            (true, false) => EditRecord::Insert {
                offset: start,
                text: text.to_string(),
            },
            (false, true) => EditRecord::Delete {
                offset: start,
                text: removed,
            },
            (false, false) => EditRecord::Replace {
                offset: start,
                removed,
                inserted: text.to_string(),
            },
        };
        let caret = start + text.chars().count();
        let before = self.selection;
        self.apply(&record);
        self.selection = Selection::caret(caret);
        self.finish(record, before);
    }

    /// Replace all content wholesale (new/open file).
    ///
    /// Caret goes to the start, history is discarded and the buffer is
    /// marked clean.
    pub fn set_text(&mut self, text: &str) {
        self.rope.replace(text);
        self.selection = Selection::caret(0);
        self.tracker.reset();
        self.notify_history();
    }

    // ====================================================================
    // Undo / redo
    // ====================================================================

    /// Undo the last mutation. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.tracker.pop_undo() else {
            return false;
        };
        let inverse = entry.record.inverse();
        self.apply(&inverse);
        self.selection = entry.before.clamp(self.rope.len_chars());
        self.tracker.commit_undo(entry);
        self.notify_edit(&inverse);
        true
    }

    /// Redo the last undone mutation. Returns `false` when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.tracker.pop_redo() else {
            return false;
        };
        let record = entry.record.clone();
        self.apply(&record);
        self.selection = entry.after.clamp(self.rope.len_chars());
        self.tracker.commit_redo(entry);
        self.notify_edit(&record);
        true
    }

    /// Whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.tracker.can_undo()
    }

    /// Whether redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.tracker.can_redo()
    }

    /// Whether the buffer changed since the last clean point.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Clear the dirty flag (after a successful save).
    pub fn mark_clean(&mut self) {
        self.tracker.mark_clean();
        self.notify_history();
    }

    /// Force the dirty flag on.
    pub fn mark_dirty(&mut self) {
        self.tracker.mark_dirty();
        self.notify_history();
    }

    /// Read access to the change tracker.
    #[must_use]
    pub fn history(&self) -> &ChangeTracker {
        &self.tracker
    }

    // ====================================================================
    // Internals
    // ====================================================================

    fn check_offset(&self, offset: usize) -> Result<()> {
        let len = self.rope.len_chars();
        if offset > len {
            return Err(BufferError::OutOfRange { offset, len });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        self.check_offset(start)?;
        self.check_offset(end)?;
        if start > end {
            return Err(BufferError::OutOfRange {
                offset: start,
                len: self.rope.len_chars(),
            });
        }
        Ok(())
    }

    /// Apply a fresh edit, shift the selection across it and record it.
    fn commit(&mut self, record: EditRecord) {
        let before = self.selection;
        self.apply(&record);
        self.selection = before.shifted(&record).clamp(self.rope.len_chars());
        self.finish(record, before);
    }

    fn finish(&mut self, record: EditRecord, before: Selection) {
        let after = self.selection;
        if let Some(observer) = self.observer.as_mut() {
            observer.edited(&record);
        }
        self.tracker.record(record, before, after);
        self.notify_history();
    }

    /// Apply a record to the rope only.
    fn apply(&mut self, record: &EditRecord) {
        match record {
            EditRecord::Insert { offset, text } => self.rope.insert(*offset, text),
            EditRecord::Delete { offset, .. } => {
                let end = offset + record.removed_chars();
                self.rope.remove(*offset..end);
            }
            EditRecord::Replace {
                offset, inserted, ..
            } => {
                let end = offset + record.removed_chars();
                self.rope.remove(*offset..end);
                self.rope.insert(*offset, inserted);
            }
        }
    }

    fn notify_edit(&mut self, record: &EditRecord) {
        if let Some(observer) = self.observer.as_mut() {
            observer.edited(record);
        }
        self.notify_history();
    }

    fn notify_history(&mut self) {
        let state = self.tracker.state();
        if let Some(observer) = self.observer.as_mut() {
            observer.history_changed(state);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize, String),
        Delete(usize, usize),
        Select(usize, usize),
        Replace(String),
        Undo,
        Redo,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..64, "[a-z\u{e9} ]{0,6}").prop_map(|(o, t)| Op::Insert(o, t)),
            (0usize..64, 0usize..64).prop_map(|(a, b)| Op::Delete(a, b)),
            (0usize..64, 0usize..64).prop_map(|(a, b)| Op::Select(a, b)),
            "[a-z]{0,4}".prop_map(Op::Replace),
            Just(Op::Undo),
            Just(Op::Redo),
        ]
    }

    fn run(buf: &mut TextBuffer, op: &Op) {
        let len = buf.len_chars();
        match op {
            Op::Insert(o, t) => {
                let _ = buf.insert((*o).min(len), t);
            }
            Op::Delete(a, b) => {
                let (a, b) = ((*a).min(len), (*b).min(len));
                let _ = buf.delete(a.min(b), a.max(b));
            }
            Op::Select(a, b) => {
                let _ = buf.set_selection((*a).min(len), (*b).min(len));
            }
            Op::Replace(t) => buf.replace_selection(t),
            Op::Undo => {
                buf.undo();
            }
            Op::Redo => {
                buf.redo();
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn offsets_always_in_bounds(
            text in "[a-z \n]{0,40}",
            ops in prop::collection::vec(op_strategy(), 0..40),
        ) {
            let mut buf = TextBuffer::with_text(&text);
            for op in &ops {
                run(&mut buf, op);
                let len = buf.len_chars();
                prop_assert!(buf.caret() <= len);
                prop_assert!(buf.anchor() <= len);
            }
        }

        #[test]
        fn undo_everything_restores_original(
            text in "[a-z ]{0,40}",
            ops in prop::collection::vec(op_strategy(), 0..30),
        ) {
            let mut buf = TextBuffer::with_config(HistoryConfig::unlimited());
            buf.set_text(&text);
            for op in &ops {
                run(&mut buf, op);
            }
            while buf.undo() {}
            prop_assert_eq!(buf.text(), text);
        }

        #[test]
        fn undo_then_redo_is_identity(
            text in "[a-z ]{0,40}",
            ops in prop::collection::vec(op_strategy(), 1..30),
        ) {
            let mut buf = TextBuffer::with_text(&text);
            for op in &ops {
                run(&mut buf, op);
            }
            let before = buf.text();
            if buf.undo() {
                prop_assert!(buf.redo());
            }
            prop_assert_eq!(buf.text(), before);
        }

        #[test]
        fn single_edit_makes_dirty(
            text in "[a-z]{1,20}",
            insert in "[a-z]{1,5}",
            end in 1usize..20,
        ) {
            let end = end.min(text.chars().count());

            let mut buf = TextBuffer::with_text(&text);
            buf.mark_clean();
            prop_assert!(!buf.is_dirty());
            buf.insert(0, &insert).unwrap();
            prop_assert!(buf.is_dirty());
            prop_assert!(buf.can_undo());

            let mut buf = TextBuffer::with_text(&text);
            buf.mark_clean();
            buf.delete(0, end).unwrap();
            prop_assert!(buf.is_dirty());
            prop_assert!(buf.can_undo());

            let mut buf = TextBuffer::with_text(&text);
            buf.mark_clean();
            buf.select(0, end).unwrap();
            buf.replace_selection(&insert);
            prop_assert!(buf.is_dirty());
            prop_assert!(buf.can_undo());

            buf.insert(0, "z").unwrap();
            prop_assert!(buf.is_dirty());
        }
    }
}
