//! Diagnostic logging setup.
//!
//! The chat TUI owns stderr, so tracing output only goes to a file there, and
//! only when `--debug-log` is given. Non-interactive commands log warnings to
//! stderr. `MASQUERADE_LOG` accepts the usual `EnvFilter` directives.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "MASQUERADE_LOG";

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Sends tracing output to `path`, appending. Returns an error if the file
/// cannot be opened so the caller can refuse to start.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // A subscriber may already be installed (e.g. by tests); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("masquerade=debug"))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Warnings and errors to stderr, for commands that never enter the TUI.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("masquerade=warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
