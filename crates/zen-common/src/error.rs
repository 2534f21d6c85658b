//! Common error types for Zen.

use thiserror::Error;

/// Result type alias using Zen's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the shared infrastructure.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Environment variable present but unparsable
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },
}

impl Error {
    /// Create a config error from any displayable type.
    pub fn config(msg: impl std::fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }
}
