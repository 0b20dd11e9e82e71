//! Logging configuration.
//!
//! Logs always go to stderr: in console mode stdout carries command results
//! and must stay clean.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the log filter from an explicit directive, `RUST_LOG`, or the default.
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    if let Some(directive) = directive {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Warning: Ignoring invalid log filter '{directive}': {e}"),
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(directive: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directive))
        .with_writer(std::io::stderr)
        .init();
}
