#![forbid(unsafe_code)]

//! Subscriber setup for the `wte` binary.
//!
//! Logs go to stderr so they never mix with match output on stdout.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "WTE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Filter directive from `WTE_LOG`, then `RUST_LOG`, then `warn`.
pub fn filter_directive<F>(get_env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [ENV_LOG, "RUST_LOG"]
        .into_iter()
        .filter_map(|key| get_env(key))
        .find(|val| !val.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber. Calling this twice is harmless.
pub fn init(json: bool) {
    let directive = filter_directive(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("Invalid log filter {directive:?}: {err}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
