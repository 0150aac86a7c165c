#![forbid(unsafe_code)]

//! Incremental search and replace for the Weekend Text Editor core.
//!
//! Engines operate on a borrowed [`wte_text::TextBuffer`] and report status,
//! scrolling and settings persistence through a [`SearchHost`] supplied with
//! each call.
//!
//! - [`SearchEngine`]: forward/backward search resuming relative to the caret
//! - [`ReplaceEngine`]: conditional replace and replace-all
//! - [`SearchSettings`]: pattern, replacement, case rule, direction
//! - [`SearchDialog`]: toolkit-neutral dialog controller

pub mod dialog;
pub mod host;
pub mod replace;
pub mod search;
pub mod settings;

pub use dialog::{DialogActions, DialogCommand, DialogResult, SearchDialog};
pub use host::{SearchHost, SearchOutcome, not_found_message};
pub use replace::{ReplaceEngine, ReplaceOutcome};
pub use search::{SearchCursor, SearchEngine, scan_backward, scan_forward};
pub use settings::{
    Direction, KEY_CASE_SENSITIVE, KEY_PATTERN, KEY_REPLACEMENT, SearchSettings, SettingsStore,
};
