#![forbid(unsafe_code)]

//! Text storage and change tracking for the Weekend Text Editor core.
//!
//! This crate provides:
//! - [`Rope`] character-addressed storage
//! - [`TextBuffer`] with caret, selection and an embedded [`ChangeTracker`]
//! - [`EditRecord`] invertible edit records
//! - Length-preserving case folding in [`fold`]

/// Mutable buffer with caret/selection.
pub mod buffer;
/// Invertible edit records.
pub mod edit;
/// Buffer error type.
pub mod error;
/// Length-preserving case folding.
pub mod fold;
/// Undo/redo history and dirty tracking.
pub mod history;
/// Rope-backed storage.
pub mod rope;

pub use buffer::{BufferObserver, Selection, TextBuffer};
pub use edit::EditRecord;
pub use error::BufferError;
pub use history::{ChangeTracker, HistoryConfig, HistoryEntry, HistoryState};
pub use rope::Rope;
