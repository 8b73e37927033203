//! Export pipeline for studypack.
//!
//! Pulls candidate records from an [`EntitySource`], expands each selected
//! type through its [`ClosureStrategy`], runs the integrity checker over the
//! candidates and assembles the manifest from what survives.
//!
//! ```no_run
//! # async fn run(snapshot: studypack_export::Snapshot) -> studypack_export::ExportResult<()> {
//! use studypack_export::{ExportConfig, ExportPipeline, MemorySource};
//!
//! let pipeline = ExportPipeline::new(MemorySource::new(snapshot), ExportConfig::default());
//! let outcome = pipeline.export_tasks(&["5f1e0c2a9b3d4e5f6a7b8c9d".to_string()]).await?;
//! println!("{}", outcome.manifest.to_json_pretty().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod closure;
mod config;
mod error;
mod pipeline;
mod source;

pub use closure::{
    CONSENT_FIELDS, ClosureRegistry, ClosureStrategy, Dependents, DirectClosure, ExportContext,
    STUDY_FIELDS, SeededClosure, Selector, SelectorFields, WholeTypeClosure,
};
pub use config::{CompanionPair, ExportConfig};
pub use error::{ExportError, ExportResult};
pub use pipeline::{ExportOutcome, ExportPipeline};
pub use source::{EntitySource, Filter, MemorySource, Snapshot};
