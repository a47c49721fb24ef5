//! Error types for layer drivers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for layer driver operations.
pub type GisResult<T> = Result<T, GisError>;

/// Errors that can occur while reading or writing geometry layers.
#[derive(Debug, Error)]
pub enum GisError {
    /// A data source could not be opened or parsed.
    #[error("data source {path} not readable: {reason}")]
    SourceUnreadable {
        /// Path of the data source.
        path: PathBuf,
        /// Why it could not be read.
        reason: String,
    },

    /// The output file already exists.
    #[error("output file {path} exists")]
    OutputExists {
        /// Path of the existing file.
        path: PathBuf,
    },

    /// The projection lookup collaborator failed.
    #[error("projection lookup failed: {0}")]
    ProjectionLookup(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A layer could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GisError {
    /// Creates a source-unreadable error.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for plain I/O failures, as opposed to domain errors.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
