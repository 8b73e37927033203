//! Error types for the export layer.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while computing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Malformed caller input, rejected before any traversal.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store answered a query with a fault record.
    #[error("store fault: {0}")]
    Fault(String),

    /// The entity source failed.
    #[error("source error: {0}")]
    Source(String),

    #[error(transparent)]
    Integrity(#[from] studypack_integrity::IntegrityError),

    #[error(transparent)]
    Manifest(#[from] studypack_manifest::ManifestError),

    #[error(transparent)]
    Model(#[from] studypack_model::ModelError),
}

impl ExportError {
    /// Detail text of a blocked export (see `IntegrityError::reason`).
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Integrity(e) => e.reason(),
            _ => None,
        }
    }

    /// True if a global export rule stopped the export.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            Self::Integrity(studypack_integrity::IntegrityError::ExportBlocked { .. })
        )
    }
}
