//! Error types for the integrity layer.

use thiserror::Error;

/// Result type for integrity operations.
pub type IntegrityResult<T> = Result<T, IntegrityError>;

/// Errors that can occur while checking an export's integrity.
///
/// Soft violations never surface here; they become `RemovalRecord`s.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// Caller input that cannot be checked at all.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A global export rule failed; no manifest may be produced.
    #[error("{message}")]
    ExportBlocked { message: String, reason: String },

    /// Model error (e.g. a record nested too deeply to walk).
    #[error("model error: {0}")]
    Model(#[from] studypack_model::ModelError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntegrityError {
    /// The detail text of a blocked export.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::ExportBlocked { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
