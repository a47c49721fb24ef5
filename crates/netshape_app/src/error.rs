//! Orchestrator errors.

use netshape_core::CoreError;
use netshape_gis::GisError;
use netshape_remote::RemoteError;
use thiserror::Error;

/// Result type for import and export runs.
pub type AppResult<T> = Result<T, AppError>;

/// Any failure of an import or export run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reconciliation or schema failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Layer driver failure.
    #[error(transparent)]
    Gis(#[from] GisError),

    /// Remote service failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// No coordinate reference system is known where one is required.
    #[error("projection unresolvable: {reason}")]
    ProjectionUnresolvable {
        /// What was tried.
        reason: String,
    },
}

impl AppError {
    /// Creates a projection error.
    pub fn projection_unresolvable(reason: impl Into<String>) -> Self {
        Self::ProjectionUnresolvable {
            reason: reason.into(),
        }
    }

    /// True for generic I/O failures of a driver or store, false for domain
    /// failures.
    #[must_use]
    pub fn is_io(&self) -> bool {
        match self {
            Self::Gis(e) => e.is_io(),
            Self::Remote(e) => e.is_io(),
            Self::Core(_) | Self::ProjectionUnresolvable { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_failures_are_distinguished() {
        let io_err: AppError = GisError::from(io::Error::new(io::ErrorKind::Other, "disk")).into();
        assert!(io_err.is_io());

        let exists: AppError = GisError::OutputExists {
            path: "out/a.geojson".into(),
        }
        .into();
        assert!(!exists.is_io());
        assert_eq!(exists.to_string(), "output file out/a.geojson exists");
    }

    #[test]
    fn core_errors_keep_their_message() {
        let err: AppError = CoreError::ambiguous_schema("Reservoir", "depth").into();
        assert!(err.to_string().contains("depth"));
        assert!(!err.is_io());
    }
}
