//! Process-level error types for userdeck
//!
//! Pipeline faults (transport, validation, storage) are non-fatal and live in
//! the ingest crate. The variants here cover what can actually stop a run.

use thiserror::Error;

/// Result type alias for userdeck operations
pub type Result<T> = std::result::Result<T, UserdeckError>;

/// Main error type for userdeck
#[derive(Error, Debug)]
pub enum UserdeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Storage setup failed: {0}")]
    Storage(String),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl UserdeckError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a logging setup error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage setup error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
