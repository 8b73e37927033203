//! Core data model for studypack exports.
//!
//! Defines the types every other studypack crate depends on:
//! - [`ObjectId`]: the 24-hex-digit identifier used by the store
//! - [`TypeSchema`] / [`FieldDefinition`]: an object type's field layout
//! - [`ReferenceSpec`]: the reference-bearing fields derived from a schema
//! - [`Entity`]: a heterogeneous record as returned by the store
//! - [`Node`] / [`collect_ids`]: typed walk over arbitrary record values
//! - [`SchemaCatalog`]: the immutable per-run context (types + reference specs)

mod catalog;
mod entity;
mod ids;
mod schema;
mod walk;

pub use catalog::{SchemaCatalog, TypeSummary};
pub use entity::Entity;
pub use ids::ObjectId;
pub use schema::{FieldDefinition, FieldKind, ReferenceSpec, TypeSchema, projection_paths};
pub use walk::{MAX_WALK_DEPTH, Node, collect_ids};

/// Result type alias using the crate's error type.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building or reading model types.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("unknown object: {0}")]
    UnknownObject(String),

    #[error("value nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
