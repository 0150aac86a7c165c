#![forbid(unsafe_code)]

//! Undo/redo history and the sticky dirty flag.
//!
//! [`ChangeTracker`] keeps dual stacks of [`EditRecord`]s, one entry per
//! buffer mutation, together with the selection before and after each edit
//! so undo/redo can put the caret back where the user expects it.
//!
//! # Invariants
//!
//! 1. `total_bytes` always equals the sum of `size_bytes()` over both stacks
//! 2. `undo_depth() <= config.max_depth` after any operation
//! 3. `total_bytes <= config.max_bytes` after any operation (if enforced)
//! 4. The redo stack is cleared whenever a new edit is recorded
//! 5. `dirty` only goes from `true` to `false` through [`ChangeTracker::mark_clean`]
//!    or [`ChangeTracker::reset`]
//!
//! ```text
//! record(e3)
//! ┌───────────────────────────────────────────┐
//! │ Undo: [e1, e2, e3]   Redo: []    dirty    │
//! └───────────────────────────────────────────┘
//! undo() x2
//! ┌───────────────────────────────────────────┐
//! │ Undo: [e1]           Redo: [e3, e2] dirty │
//! └───────────────────────────────────────────┘
//! mark_clean()
//! ┌───────────────────────────────────────────┐
//! │ Undo: [e1]           Redo: [e3, e2] clean │
//! └───────────────────────────────────────────┘
//! ```
//!
//! The tracker never touches text itself; [`TextBuffer`](crate::TextBuffer)
//! applies the records it pops.

use std::collections::VecDeque;

use crate::buffer::Selection;
use crate::edit::EditRecord;

/// Limits for the history stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of records kept for undo.
    pub max_depth: usize,
    /// Maximum total bytes of retained text (0 = unlimited).
    pub max_bytes: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with custom limits.
    #[must_use]
    pub fn new(max_depth: usize, max_bytes: usize) -> Self {
        Self {
            max_depth,
            max_bytes,
        }
    }

    /// Unlimited history (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_bytes: 0,
        }
    }
}

/// One recorded mutation plus the selection on either side of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The edit as it was applied.
    pub record: EditRecord,
    /// Selection before the edit; restored by undo.
    pub before: Selection,
    /// Selection after the edit; restored by redo.
    pub after: Selection,
}

/// Snapshot of the UI-facing history flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub dirty: bool,
}

/// Undo/redo stacks with a sticky dirty flag.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    config: HistoryConfig,
    total_bytes: usize,
    dirty: bool,
}

impl ChangeTracker {
    /// Create an empty, clean tracker.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
            total_bytes: 0,
            dirty: false,
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record a freshly applied edit.
    ///
    /// Clears the redo stack (new branch), marks the tracker dirty and
    /// enforces the configured limits.
    pub fn record(&mut self, record: EditRecord, before: Selection, after: Selection) {
        self.clear_redo();
        tracing::trace!(
            kind = record.description(),
            offset = record.offset(),
            "history record"
        );
        self.total_bytes += record.size_bytes();
        self.undo_stack.push_back(HistoryEntry {
            record,
            before,
            after,
        });
        self.dirty = true;
        self.enforce_limits(Stack::Undo);
    }

    /// Pop the newest undoable entry.
    ///
    /// The caller applies `entry.record.inverse()` and hands the entry back
    /// through [`ChangeTracker::commit_undo`].
    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop_back()?;
        self.total_bytes = self.total_bytes.saturating_sub(entry.record.size_bytes());
        Some(entry)
    }

    /// Finish an undo: the entry becomes redoable.
    pub fn commit_undo(&mut self, entry: HistoryEntry) {
        self.total_bytes += entry.record.size_bytes();
        self.redo_stack.push_back(entry);
        self.dirty = true;
        self.enforce_limits(Stack::Redo);
    }

    /// Pop the newest redoable entry.
    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop_back()?;
        self.total_bytes = self.total_bytes.saturating_sub(entry.record.size_bytes());
        Some(entry)
    }

    /// Finish a redo: the entry becomes undoable again, redo stack intact.
    pub fn commit_redo(&mut self, entry: HistoryEntry) {
        self.total_bytes += entry.record.size_bytes();
        self.undo_stack.push_back(entry);
        self.dirty = true;
        self.enforce_limits(Stack::Undo);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Whether any mutation happened since the last clean point.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Get the undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of the next undo entry.
    #[must_use]
    pub fn next_undo_description(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|e| e.record.description())
    }

    /// Description of the next redo entry.
    #[must_use]
    pub fn next_redo_description(&self) -> Option<&'static str> {
        self.redo_stack.back().map(|e| e.record.description())
    }

    /// Total retained text bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.total_bytes
    }

    /// Current limits.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// UI-facing flags in one value.
    #[must_use]
    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            dirty: self.dirty,
        }
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Clear the dirty flag (after a save or a fresh load).
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Force the dirty flag on.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Discard both stacks and mark clean; used on wholesale content replacement.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.total_bytes = 0;
        self.dirty = false;
    }

    fn clear_redo(&mut self) {
        for entry in self.redo_stack.drain(..) {
            self.total_bytes = self.total_bytes.saturating_sub(entry.record.size_bytes());
        }
    }

    /// Evict oldest entries until depth and memory limits hold.
    ///
    /// The entry just pushed onto `newest` is never evicted for memory, so a
    /// single oversized edit stays undoable (or redoable).
    fn enforce_limits(&mut self, newest: Stack) {
        while self.undo_stack.len() > self.config.max_depth {
            if let Some(entry) = self.undo_stack.pop_front() {
                tracing::trace!("history evicted oldest entry (depth)");
                self.total_bytes = self.total_bytes.saturating_sub(entry.record.size_bytes());
            }
        }

        if self.config.max_bytes == 0 {
            return;
        }
        let undo_floor = usize::from(newest == Stack::Undo);
        let redo_floor = usize::from(newest == Stack::Redo);
        while self.total_bytes > self.config.max_bytes {
            // Speculative (redo) history goes first.
            let entry = if self.redo_stack.len() > redo_floor {
                self.redo_stack.pop_front()
            } else if self.undo_stack.len() > undo_floor {
                tracing::trace!("history evicted oldest entry (memory)");
                self.undo_stack.pop_front()
            } else {
                None
            };
            match entry {
                Some(entry) => {
                    self.total_bytes = self.total_bytes.saturating_sub(entry.record.size_bytes());
                }
                None => break,
            }
        }
    }
}

/// Which stack received the latest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stack {
    Undo,
    Redo,
}
