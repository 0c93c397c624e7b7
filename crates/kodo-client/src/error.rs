//! Client error types

use kodo_auth::AuthError;
use thiserror::Error;

/// Result type for request construction
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while building requests
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("http error: {0}")]
    Http(#[from] http::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
