//! Error taxonomy for the ingestion pipeline
//!
//! None of these stop a run. The ingestor logs each one against the page or
//! record it belongs to and moves on.

use thiserror::Error;

/// A listing page or detail record could not be fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Only reachable when a request timeout is configured
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TransportError {
    pub fn request(url: impl ToString, message: impl ToString) -> Self {
        Self::Request {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(url: impl ToString, message: impl ToString) -> Self {
        Self::Decode {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Request { .. } => "request",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Status { .. } => "status",
            TransportError::Decode { .. } => "decode",
        }
    }
}

/// The store rejected a write or could not answer a query.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User {0} is already stored")]
    Duplicate(i64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Stored row for user {id} no longer validates: {reason}")]
    CorruptRow { id: i64, reason: String },
}
