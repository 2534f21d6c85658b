//! Shared utilities for Zen: logging, environment helpers, error types.
//!
//! Logging is process-wide and initialised exactly once at startup. Components
//! that forward messages from outside the crate graph (GL debug output, the
//! remote client) go through [`log_at`] so they keep their origin tag.

#![forbid(unsafe_code)]

pub mod error;
pub mod helpers;
pub mod severity;

use std::sync::OnceLock;

pub use error::{Error, Result};
pub use severity::{log_at, Severity};

static LOGGING: OnceLock<String> = OnceLock::new();

/// Install the process-wide tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `default_filter`.
/// Fails if a subscriber was already installed.
pub fn init_logging(default_filter: &str) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(Error::config)?;
    let directives = filter.to_string();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| Error::config(format!("logging already initialized: {err}")))?;

    LOGGING
        .set(directives)
        .map_err(|_| Error::config("logging already initialized"))
}

/// Whether [`init_logging`] has completed.
pub fn logging_initialized() -> bool {
    LOGGING.get().is_some()
}

/// Fails unless the process-wide sink is installed.
pub fn require_logging() -> Result<()> {
    match LOGGING.get() {
        Some(_) => Ok(()),
        None => Err(Error::config(
            "logging used before initialization; call zen_common::init_logging first",
        )),
    }
}
