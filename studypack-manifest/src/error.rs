//! Error types for the manifest crate.

use thiserror::Error;

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("model error: {0}")]
    Model(#[from] studypack_model::ModelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
