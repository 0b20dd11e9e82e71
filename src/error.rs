//! Error types for the tile game server.
//!
//! Per-command failures (syntax, dispatch) live next to the code that raises
//! them in [`crate::commands`]. This module holds the process-level errors.

use thiserror::Error;

/// Main error type for server operations.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (invalid config file, bad bind address, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O errors (stdin/stdout, listener bind).
    #[error("I/O error: {0}")]
    Io(String),

    /// Network transport errors (handshake, read, write on a session).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal application errors (closed channels, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Transport(_) => "Transport Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias using ServerError.
pub type Result<T> = std::result::Result<T, ServerError>;
