//! Error types for the remote client.

use std::io;
use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors returned by a remote network model service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The requested object does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Object kind, such as `network`.
        kind: &'static str,
        /// Requested identity.
        id: i64,
    },

    /// The service refused a request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backing store could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A message or store file could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemoteError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Creates a rejection.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// True for plain I/O failures.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
