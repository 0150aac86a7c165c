#![forbid(unsafe_code)]

//! Document host and persistence layer.
//!
//! [`Document`] owns the single open buffer together with everything that
//! lives beside it: the file path, the Find and Replace dialogs (each with
//! its own engine and cursor), the property store, the recent-file list,
//! the status line and an in-process clipboard.
//!
//! User interaction that the host cannot decide on its own (whether to save
//! unsaved changes, where to save a new file) goes through [`SavePrompt`].
//!
//! # Lifecycle
//!
//! ```text
//!  new_file / open ──► set_text ──► clean, caret 0, cursors reset
//!        │
//!   edits, find, replace ──► dirty
//!        │
//!  save / save_as ──► clean, recent.put, "Saved to file ..."
//!        │
//!  close ──► recent + settings written to disk
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use wte_search::{
    DialogCommand, DialogResult, ReplaceEngine, ReplaceOutcome, SearchDialog, SearchEngine,
    SearchHost, SearchOutcome, SearchSettings,
};
use wte_text::{BufferError, TextBuffer};

use crate::config::EditorConfig;
use crate::recent::RecentFiles;
use crate::status::StatusLine;
use crate::store::{PropertyStore, StoreError};

/// Application name, shown in the window title.
pub const APP_NAME: &str = "WeekendTextEditor";

/// Answer to "the text has been changed, save it?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// Questions the document asks its user.
pub trait SavePrompt {
    /// The buffer has unsaved changes; ask what to do with them.
    fn confirm_save(&mut self) -> SaveChoice;

    /// Ask for a file to save to. `None` abandons the save.
    fn choose_save_path(&mut self, current: Option<&Path>) -> Option<PathBuf>;
}

/// Errors from document operations.
#[derive(Debug)]
pub enum DocumentError {
    /// The file to open does not exist.
    NotFound(PathBuf),
    /// Reading or writing the file failed.
    Io { path: PathBuf, source: io::Error },
    /// A buffer offset was out of range.
    Buffer(BufferError),
    /// The settings file could not be written.
    Store(StoreError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "File {} not found.", path.display()),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Buffer(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Buffer(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<BufferError> for DocumentError {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}

impl From<StoreError> for DocumentError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Routes engine side effects into the document's status line and store.
struct HostBridge<'a> {
    status: &'a mut StatusLine,
    store: &'a mut PropertyStore,
    scroll: &'a mut Option<usize>,
}

impl SearchHost for HostBridge<'_> {
    fn scroll_into_view(&mut self, offset: usize) {
        *self.scroll = Some(offset);
    }

    fn notify_status(&mut self, message: &str) {
        self.status.show(message);
    }

    fn store_setting(&mut self, key: &str, value: &str) {
        self.store.set(key, value);
    }
}

/// The single open document.
#[derive(Debug)]
pub struct Document {
    buffer: TextBuffer,
    path: Option<PathBuf>,
    find_dialog: SearchDialog<SearchEngine>,
    replace_dialog: SearchDialog<ReplaceEngine>,
    store: PropertyStore,
    recent: RecentFiles,
    status: StatusLine,
    clipboard: Option<String>,
    last_scroll: Option<usize>,
}

impl Document {
    /// Empty document using `store` for search settings and recent files.
    #[must_use]
    pub fn new(config: &EditorConfig, store: PropertyStore) -> Self {
        let settings = SearchSettings::load(&store);
        let recent = RecentFiles::load(&store, config.recent_capacity);
        Self {
            buffer: TextBuffer::with_config(config.history.clone()),
            path: None,
            find_dialog: SearchDialog::new(SearchEngine::new(settings.clone())),
            replace_dialog: SearchDialog::new(ReplaceEngine::new(settings)),
            store,
            recent,
            status: StatusLine::new(config.status_ttl),
            clipboard: None,
            last_scroll: None,
        }
    }

    /// Empty document backed by the settings file named in `config`.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let store = PropertyStore::load(config.settings_path.clone());
        Self::new(config, store)
    }

    // ====================================================================
    // File operations
    // ====================================================================

    /// Start a new, empty, untitled document.
    ///
    /// Returns `false` when the user cancelled at the unsaved-changes prompt.
    pub fn new_file(&mut self, prompt: &mut dyn SavePrompt) -> Result<bool, DocumentError> {
        if !self.save_if_necessary(prompt)? {
            return Ok(false);
        }
        self.path = None;
        self.replace_content("");
        tracing::info!("new document");
        Ok(true)
    }

    /// Open `path` after offering to save unsaved changes.
    ///
    /// Returns `false` when the user cancelled at the prompt.
    pub fn open(
        &mut self,
        path: impl Into<PathBuf>,
        prompt: &mut dyn SavePrompt,
    ) -> Result<bool, DocumentError> {
        if !self.save_if_necessary(prompt)? {
            return Ok(false);
        }
        self.load(path)?;
        Ok(true)
    }

    /// Replace the content with the file at `path` without prompting.
    ///
    /// A missing file is dropped from the recent list. On any error the
    /// current content and path are kept.
    pub fn load(&mut self, path: impl Into<PathBuf>) -> Result<(), DocumentError> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.recent.remove(&path.to_string_lossy());
                tracing::warn!(path = %path.display(), "file not found");
                return Err(DocumentError::NotFound(path));
            }
            Err(source) => return Err(DocumentError::Io { path, source }),
        };

        self.replace_content(&content);
        self.recent.put(path.to_string_lossy());
        tracing::info!(path = %path.display(), chars = self.buffer.len_chars(), "opened");
        self.path = Some(path);
        Ok(())
    }

    /// Save to the current path, asking for one when the document is
    /// untitled. Returns `false` when the user abandoned the save.
    pub fn save(&mut self, prompt: &mut dyn SavePrompt) -> Result<bool, DocumentError> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => match prompt.choose_save_path(None) {
                Some(path) => path,
                None => return Ok(false),
            },
        };
        self.save_as(path)?;
        Ok(true)
    }

    /// Ask for a path (starting from the current one) and save there.
    pub fn save_as_prompted(&mut self, prompt: &mut dyn SavePrompt) -> Result<bool, DocumentError> {
        match prompt.choose_save_path(self.path.as_deref()) {
            Some(path) => {
                self.save_as(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the content to `path` as UTF-8 and make it the current file.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), DocumentError> {
        let path = path.into();
        if let Err(source) = fs::write(&path, self.buffer.text()) {
            return Err(DocumentError::Io { path, source });
        }

        self.buffer.mark_clean();
        self.recent.put(path.to_string_lossy());
        self.status
            .show(&format!("Saved to file {}", path.display()));
        tracing::info!(path = %path.display(), "saved");
        self.path = Some(path);
        Ok(())
    }

    /// Offer to save unsaved changes. Returns `true` when it is safe to
    /// throw the current content away.
    pub fn save_if_necessary(&mut self, prompt: &mut dyn SavePrompt) -> Result<bool, DocumentError> {
        if !self.buffer.is_dirty() {
            return Ok(true);
        }
        match prompt.confirm_save() {
            SaveChoice::Save => {
                self.save(prompt)?;
                Ok(!self.buffer.is_dirty())
            }
            SaveChoice::Discard => Ok(true),
            SaveChoice::Cancel => Ok(false),
        }
    }

    /// Persist the recent list and all settings.
    pub fn close(&mut self) -> Result<(), DocumentError> {
        self.recent.save(&mut self.store);
        self.store.save()?;
        tracing::debug!("document closed");
        Ok(())
    }

    fn replace_content(&mut self, content: &str) {
        self.buffer.set_text(content);
        self.find_dialog.actions_mut().reset_position();
        self.replace_dialog.actions_mut().reset_position();
        self.last_scroll = None;
    }

    // ====================================================================
    // Search and replace
    // ====================================================================

    /// Find the next match with the Find engine's settings.
    pub fn find(&mut self) -> Result<SearchOutcome, DocumentError> {
        let mut host = HostBridge {
            status: &mut self.status,
            store: &mut self.store,
            scroll: &mut self.last_scroll,
        };
        Ok(self.find_dialog.actions_mut().find(&mut self.buffer, &mut host)?)
    }

    /// Replace the current match (or move to the next one) with the Replace
    /// engine's settings.
    pub fn replace_one(&mut self) -> Result<ReplaceOutcome, DocumentError> {
        let mut host = HostBridge {
            status: &mut self.status,
            store: &mut self.store,
            scroll: &mut self.last_scroll,
        };
        Ok(self
            .replace_dialog
            .actions_mut()
            .replace_one(&mut self.buffer, &mut host)?)
    }

    /// Replace every remaining match. Returns the number of replacements.
    pub fn replace_all(&mut self) -> Result<usize, DocumentError> {
        let mut host = HostBridge {
            status: &mut self.status,
            store: &mut self.store,
            scroll: &mut self.last_scroll,
        };
        Ok(self
            .replace_dialog
            .actions_mut()
            .replace_all(&mut self.buffer, &mut host)?)
    }

    /// Show the Find dialog, seeded with the current settings.
    pub fn open_find_dialog(&mut self) {
        let seed = self.current_settings();
        self.find_dialog.open(&seed);
    }

    /// Show the Replace dialog, seeded with the current settings.
    pub fn open_replace_dialog(&mut self) {
        let seed = self.current_settings();
        self.replace_dialog.open(&seed);
    }

    /// Press a button in the Find dialog.
    pub fn submit_find_dialog(&mut self, command: DialogCommand) -> Result<DialogResult, DocumentError> {
        let mut host = HostBridge {
            status: &mut self.status,
            store: &mut self.store,
            scroll: &mut self.last_scroll,
        };
        Ok(self.find_dialog.submit(command, &mut self.buffer, &mut host)?)
    }

    /// Press a button in the Replace dialog.
    pub fn submit_replace_dialog(
        &mut self,
        command: DialogCommand,
    ) -> Result<DialogResult, DocumentError> {
        let mut host = HostBridge {
            status: &mut self.status,
            store: &mut self.store,
            scroll: &mut self.last_scroll,
        };
        Ok(self
            .replace_dialog
            .submit(command, &mut self.buffer, &mut host)?)
    }

    /// Settings as last persisted, falling back to the Find engine's.
    fn current_settings(&self) -> SearchSettings {
        let mut settings = SearchSettings::load(&self.store);
        settings.direction = self.find_dialog.actions().settings().direction;
        settings
    }

    // ====================================================================
    // Editing
    // ====================================================================

    pub fn undo(&mut self) -> bool {
        self.buffer.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.buffer.redo()
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    /// Move the selection to the clipboard. Returns `false` with no selection.
    pub fn cut(&mut self) -> bool {
        let Some(text) = self.buffer.selected_text() else {
            return false;
        };
        self.clipboard = Some(text);
        self.buffer.replace_selection("");
        true
    }

    /// Copy the selection to the clipboard. Returns `false` with no selection.
    pub fn copy(&mut self) -> bool {
        match self.buffer.selected_text() {
            Some(text) => {
                self.clipboard = Some(text);
                true
            }
            None => false,
        }
    }

    /// Replace the selection with the clipboard. Returns `false` when the
    /// clipboard is empty.
    pub fn paste(&mut self) -> bool {
        match self.clipboard.as_deref() {
            Some(text) if !text.is_empty() => {
                self.buffer.replace_selection(text);
                true
            }
            _ => false,
        }
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// Window title: the application name plus the file path, if any.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.path {
            Some(path) => format!("{APP_NAME} - {}", path.display()),
            None => APP_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Visible status message, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.message()
    }

    pub fn status_mut(&mut self) -> &mut StatusLine {
        &mut self.status
    }

    #[must_use]
    pub fn recent(&self) -> &RecentFiles {
        &self.recent
    }

    #[must_use]
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    #[must_use]
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Offset the last search asked to scroll to.
    #[must_use]
    pub fn last_scroll(&self) -> Option<usize> {
        self.last_scroll
    }

    #[must_use]
    pub fn find_dialog(&self) -> &SearchDialog<SearchEngine> {
        &self.find_dialog
    }

    pub fn find_dialog_mut(&mut self) -> &mut SearchDialog<SearchEngine> {
        &mut self.find_dialog
    }

    #[must_use]
    pub fn replace_dialog(&self) -> &SearchDialog<ReplaceEngine> {
        &self.replace_dialog
    }

    pub fn replace_dialog_mut(&mut self) -> &mut SearchDialog<ReplaceEngine> {
        &mut self.replace_dialog
    }

    /// The Find engine.
    #[must_use]
    pub fn finder(&self) -> &SearchEngine {
        self.find_dialog.actions()
    }

    pub fn finder_mut(&mut self) -> &mut SearchEngine {
        self.find_dialog.actions_mut()
    }

    /// The Replace engine.
    #[must_use]
    pub fn replacer(&self) -> &ReplaceEngine {
        self.replace_dialog.actions()
    }

    pub fn replacer_mut(&mut self) -> &mut ReplaceEngine {
        self.replace_dialog.actions_mut()
    }
}
