#![forbid(unsafe_code)]

//! Executes parsed commands against a [`Document`].

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use wte_runtime::{Document, DocumentError};
use wte_search::{Direction, ReplaceOutcome, SearchOutcome, SearchSettings};

use crate::cli::{Action, EXIT_USAGE, Opts};

/// Exit code when nothing matched.
pub const EXIT_NO_MATCH: i32 = 1;
/// Exit code for file and settings errors.
pub const EXIT_IO: i32 = 3;

#[derive(Debug)]
pub enum RunError {
    /// No pattern given and none persisted.
    NoPattern,
    Document(DocumentError),
    Output(io::Error),
}

impl RunError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoPattern | Self::Document(DocumentError::Buffer(_)) => EXIT_USAGE,
            Self::Document(_) | Self::Output(_) => EXIT_IO,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPattern => write!(f, "no search pattern (pass --pattern=P)"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "writing output: {err}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoPattern => None,
            Self::Document(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<DocumentError> for RunError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> Self {
        Self::Output(err)
    }
}

/// Run the command. Returns the process exit code on success.
pub fn run(opts: &Opts, out: &mut dyn Write) -> Result<i32, RunError> {
    let mut doc = Document::from_config(&opts.config);
    doc.load(&opts.file)?;

    let code = match opts.action {
        Action::Find => find(opts, &mut doc, out)?,
        Action::Replace => replace(opts, &mut doc, out)?,
    };
    out.flush()?;

    doc.close()?;
    Ok(code)
}

/// Persisted settings with command-line overrides applied.
fn effective_settings(opts: &Opts, persisted: &SearchSettings) -> Result<SearchSettings, RunError> {
    let mut settings = persisted.clone();
    if let Some(pattern) = &opts.pattern {
        settings.pattern.clone_from(pattern);
    }
    if let Some(replacement) = &opts.replacement {
        settings.replacement.clone_from(replacement);
    }
    if let Some(case_sensitive) = opts.case_sensitive {
        settings.case_sensitive = case_sensitive;
    }
    settings.direction = if opts.backward {
        Direction::Backward
    } else {
        Direction::Forward
    };
    if settings.is_blank() {
        return Err(RunError::NoPattern);
    }
    Ok(settings)
}

fn start_caret(opts: &Opts, doc: &Document) -> usize {
    match opts.from {
        Some(offset) => offset,
        None if opts.backward => doc.buffer().len_chars(),
        None => 0,
    }
}

fn find(opts: &Opts, doc: &mut Document, out: &mut dyn Write) -> Result<i32, RunError> {
    let settings = effective_settings(opts, doc.finder().settings())?;
    doc.finder_mut().set_settings(settings);
    let caret = start_caret(opts, doc);
    doc.buffer_mut()
        .set_caret(caret)
        .map_err(DocumentError::from)?;

    let mut matches = 0usize;
    while let SearchOutcome::Found { start, .. } = doc.find()? {
        let (line, col) = doc.buffer().rope().char_to_line_col(start);
        writeln!(out, "{}:{} {start}", line + 1, col + 1)?;
        matches += 1;
    }
    tracing::info!(matches, "find finished");
    Ok(if matches == 0 { EXIT_NO_MATCH } else { 0 })
}

fn replace(opts: &Opts, doc: &mut Document, out: &mut dyn Write) -> Result<i32, RunError> {
    let settings = effective_settings(opts, doc.replacer().settings())?;
    doc.replacer_mut().set_settings(settings);
    let caret = start_caret(opts, doc);
    doc.buffer_mut()
        .set_caret(caret)
        .map_err(DocumentError::from)?;

    let count = if opts.all {
        doc.replace_all()?
    } else {
        replace_first(doc)?
    };

    if opts.dry_run {
        write!(out, "{}", doc.buffer().text())?;
    } else if count > 0 {
        let path: PathBuf = doc.path().map_or_else(|| opts.file.clone(), Path::to_path_buf);
        doc.save_as(path)?;
    }
    writeln!(io::stderr(), "{count} replacement(s)")?;
    Ok(if count == 0 { EXIT_NO_MATCH } else { 0 })
}

/// Move onto the first match, then replace it.
fn replace_first(doc: &mut Document) -> Result<usize, RunError> {
    let mut outcome = doc.replace_one()?;
    if let ReplaceOutcome::Searched(SearchOutcome::Found { .. }) = outcome {
        outcome = doc.replace_one()?;
    }
    Ok(usize::from(matches!(outcome, ReplaceOutcome::Replaced { .. })))
}
