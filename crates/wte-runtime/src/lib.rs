#![forbid(unsafe_code)]

//! Document host for the Weekend Text Editor core.
//!
//! Ties a [`wte_text::TextBuffer`] and the `wte_search` engines to the
//! outside world:
//!
//! - [`Document`]: new/open/save with an unsaved-changes prompt, search and
//!   replace routed through the status line and settings store
//! - [`PropertyStore`]: JSON key/value settings file
//! - [`RecentFiles`]: most-recently-opened list
//! - [`StatusLine`]: transient status messages
//! - [`EditorConfig`]: defaults and `WTE_*` environment overrides

pub mod config;
pub mod document;
pub mod recent;
pub mod status;
pub mod store;

pub use config::EditorConfig;
pub use document::{APP_NAME, Document, DocumentError, SaveChoice, SavePrompt};
pub use recent::RecentFiles;
pub use status::StatusLine;
pub use store::{PropertyStore, StoreError};
