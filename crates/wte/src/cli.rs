#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually to keep the binary lean. Configuration defaults come
//! from `WTE_*` environment variables; explicit flags win.

use std::env;
use std::path::PathBuf;
use std::process;

use wte_runtime::EditorConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code for malformed command lines.
pub const EXIT_USAGE: i32 = 2;

const HELP_TEXT: &str = "\
wte - find and replace in a text file

USAGE:
    wte find FILE [OPTIONS]
    wte replace FILE [OPTIONS]

COMMANDS:
    find       Print every match as 'line:col offset'
    replace    Replace the first match (or all with --all) and save

OPTIONS:
    --pattern=P          Text to look for (default: last used pattern)
    --replacement=R      Replacement text (default: last used replacement)
    --case-sensitive     Compare exactly
    --ignore-case        Compare case-insensitively
    --backward           Search from the end toward the start
    --from=N             Start at character offset N (find only)
    --all                Replace every match (replace only)
    --dry-run            Print the result instead of saving (replace only)
    --settings=PATH      Settings file (default: weekendtexteditor.json)
    --log-json           Emit logs as JSON lines on stderr
    --help, -h           Show this help message
    --version, -V        Show version

EXIT CODES:
    0  success
    1  no match
    2  usage error
    3  file error

ENVIRONMENT VARIABLES:
    WTE_SETTINGS         Override the settings file path
    WTE_RECENT           Number of remembered recent files
    WTE_LOG              Log filter (falls back to RUST_LOG, default: warn)";

/// What to do with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Find,
    Replace,
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub action: Action,
    /// File to operate on.
    pub file: PathBuf,
    /// Pattern override; `None` uses the persisted one.
    pub pattern: Option<String>,
    /// Replacement override; `None` uses the persisted one.
    pub replacement: Option<String>,
    /// Case rule override; `None` uses the persisted one.
    pub case_sensitive: Option<bool>,
    pub backward: bool,
    /// Starting caret offset for `find`.
    pub from: Option<usize>,
    /// Replace every match instead of one.
    pub all: bool,
    /// Print the result instead of writing the file.
    pub dry_run: bool,
    /// Settings file override.
    pub settings: Option<PathBuf>,
    /// JSON log output.
    pub log_json: bool,
    /// Editor configuration after environment overrides.
    pub config: EditorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Help,
    Version,
    MissingCommand,
    MissingFile,
    InvalidValue { flag: &'static str, value: String },
    NotApplicable { flag: &'static str, action: Action },
    UnknownArg(String),
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version` or a usage error.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("wte {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                match err {
                    ParseError::MissingCommand => eprintln!("Missing command: find or replace"),
                    ParseError::MissingFile => eprintln!("Missing FILE argument"),
                    ParseError::InvalidValue { flag, value } => {
                        eprintln!("Invalid {flag} value: {value}");
                    }
                    ParseError::NotApplicable { flag, action } => {
                        eprintln!("{flag} cannot be used with {action:?}");
                    }
                    ParseError::UnknownArg(arg) => eprintln!("Unknown argument: {arg}"),
                    ParseError::Help | ParseError::Version => {}
                }
                eprintln!("Run with --help for usage information.");
                process::exit(EXIT_USAGE);
            }
        }
    }

    pub fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .collect();

        let mut action = None;
        let mut file = None;
        let mut pattern = None;
        let mut replacement = None;
        let mut case_sensitive = None;
        let mut backward = false;
        let mut from = None;
        let mut all = false;
        let mut dry_run = false;
        let mut settings = None;
        let mut log_json = false;

        for arg in &args {
            match arg.as_str() {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                "--case-sensitive" => case_sensitive = Some(true),
                "--ignore-case" => case_sensitive = Some(false),
                "--backward" => backward = true,
                "--all" => all = true,
                "--dry-run" => dry_run = true,
                "--log-json" => log_json = true,
                "find" if action.is_none() => action = Some(Action::Find),
                "replace" if action.is_none() => action = Some(Action::Replace),
                other => {
                    if let Some(val) = other.strip_prefix("--pattern=") {
                        pattern = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--replacement=") {
                        replacement = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--from=") {
                        match val.parse() {
                            Ok(n) => from = Some(n),
                            Err(_) => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--from",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--settings=") {
                        if val.trim().is_empty() {
                            return Err(ParseError::InvalidValue {
                                flag: "--settings",
                                value: val.to_string(),
                            });
                        }
                        settings = Some(PathBuf::from(val));
                    } else if other.starts_with('-') || action.is_none() || file.is_some() {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    } else {
                        file = Some(PathBuf::from(other));
                    }
                }
            }
        }

        let action = action.ok_or(ParseError::MissingCommand)?;
        let file = file.ok_or(ParseError::MissingFile)?;
        match action {
            Action::Find if all => {
                return Err(ParseError::NotApplicable { flag: "--all", action });
            }
            Action::Find if dry_run => {
                return Err(ParseError::NotApplicable { flag: "--dry-run", action });
            }
            Action::Find if replacement.is_some() => {
                return Err(ParseError::NotApplicable { flag: "--replacement", action });
            }
            Action::Replace if from.is_some() => {
                return Err(ParseError::NotApplicable { flag: "--from", action });
            }
            _ => {}
        }

        let mut config = EditorConfig::from_env_with(get_env);
        if let Some(path) = &settings {
            config.settings_path = path.clone();
        }

        Ok(Self {
            action,
            file,
            pattern,
            replacement,
            case_sensitive,
            backward,
            from,
            all,
            dry_run,
            settings,
            log_json,
            config,
        })
    }
}
