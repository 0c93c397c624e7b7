//! Signing and encoding error types

use thiserror::Error;

/// Result type for signing and encoding operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised by the signing core
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid operation error carrying the offending tag
    pub fn invalid_operation(tag: impl Into<String>) -> Self {
        Self::InvalidOperation(tag.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the error was caused by caller input rather than setup
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidOperation(_))
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
