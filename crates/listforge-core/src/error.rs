//! Error types for ListForge

use thiserror::Error;

/// Main error type for ListForge operations
#[derive(Debug, Error)]
pub enum ListForgeError {
    /// Malformed bounds or options, rejected at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// A count that does not fit the supported 32-bit range
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// Invalid operation for current solver state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListForgeError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ListForgeError::Config(message.into())
    }

    /// Shorthand for a capacity error.
    pub fn capacity(message: impl Into<String>) -> Self {
        ListForgeError::Capacity(message.into())
    }
}

/// Result type alias for ListForge operations
pub type Result<T> = std::result::Result<T, ListForgeError>;
