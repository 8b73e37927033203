//! Export manifest for studypack bundles.
//!
//! A manifest lists, per object type, the unique keys of the records an
//! export bundle carries:
//!
//! ```json
//! {
//!   "object": "manifest",
//!   "dependencies": false,
//!   "exportOwner": false,
//!   "importOwner": false,
//!   "c_task": { "includes": ["task-1", "task-2"] },
//!   "c_study": { "includes": ["study-1"], "defer": ["c_public_group"] }
//! }
//! ```
//!
//! The same document shape doubles as an export *request*: a caller passes a
//! manifest naming the records to start from ([`ManifestRequest`]).

mod assemble;
mod error;
mod manifest;
mod request;

pub use assemble::{AssemblyOptions, IncludePolicy, assemble};
pub use error::{ManifestError, ManifestResult};
pub use manifest::{MANIFEST_OBJECT, Manifest, ManifestEntry, STUDY_DEFER_PATHS, STUDY_TYPE};
pub use request::{AVAILABLE_OBJECTS, ManifestRequest};
