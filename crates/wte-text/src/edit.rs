//! Atomic, invertible edit records.

/// A single buffer mutation, with enough information to invert it.
///
/// Offsets are character indices into the buffer as it was *before* the
/// edit was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRecord {
    /// `text` was inserted at `offset`.
    Insert { offset: usize, text: String },
    /// `text` was removed starting at `offset`.
    Delete { offset: usize, text: String },
    /// `removed` at `offset` was replaced by `inserted`.
    Replace {
        offset: usize,
        removed: String,
        inserted: String,
    },
}

impl EditRecord {
    /// The record that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert { offset, text } => Self::Delete {
                offset: *offset,
                text: text.clone(),
            },
            Self::Delete { offset, text } => Self::Insert {
                offset: *offset,
                text: text.clone(),
            },
            Self::Replace {
                offset,
                removed,
                inserted,
            } => Self::Replace {
                offset: *offset,
                removed: inserted.clone(),
                inserted: removed.clone(),
            },
        }
    }

    /// Character offset the edit starts at.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::Insert { offset, .. }
            | Self::Delete { offset, .. }
            | Self::Replace { offset, .. } => *offset,
        }
    }

    /// Characters removed from the buffer by this edit.
    #[must_use]
    pub fn removed_chars(&self) -> usize {
        match self {
            Self::Insert { .. } => 0,
            Self::Delete { text, .. } => text.chars().count(),
            Self::Replace { removed, .. } => removed.chars().count(),
        }
    }

    /// Characters added to the buffer by this edit.
    #[must_use]
    pub fn inserted_chars(&self) -> usize {
        match self {
            Self::Insert { text, .. } => text.chars().count(),
            Self::Delete { .. } => 0,
            Self::Replace { inserted, .. } => inserted.chars().count(),
        }
    }

    /// Retained text size, used for history memory accounting.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Insert { text, .. } | Self::Delete { text, .. } => text.len(),
            Self::Replace {
                removed, inserted, ..
            } => removed.len() + inserted.len(),
        }
    }

    /// Short human-readable label.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "Insert text",
            Self::Delete { .. } => "Delete text",
            Self::Replace { .. } => "Replace text",
        }
    }
}
