//! Referential-integrity engine for studypack exports.
//!
//! Given a candidate set of entities and the [`SchemaCatalog`] for the run,
//! this crate decides which entities can be exported without leaving
//! dangling references behind:
//!
//! 1. **Resolve**: extract the ids each entity references, per reference field
//! 2. **Validate**: remove entities with dangling or missing required references
//! 3. **Cascade**: remove entities embedding an already-removed entity's id,
//!    repeated until a round removes nothing
//! 4. **Rules**: global constraints over the result; violations abort the export
//!
//! [`IntegrityChecker`] runs all four stages in order.
//!
//! [`SchemaCatalog`]: studypack_model::SchemaCatalog

mod cascade;
mod checker;
mod error;
mod report;
mod resolve;
mod rules;
mod validate;

pub use cascade::{CascadeOutcome, cascade};
pub use checker::IntegrityChecker;
pub use error::{IntegrityError, IntegrityResult};
pub use report::IssueReport;
pub use resolve::{ReferenceTarget, ResolvedReference, resolve};
pub use rules::{
    CompanionRule, DEFAULT_DOCUMENT_CSS_TYPE, DOCUMENT_TEMPLATE_TYPE, ExportRule, RootRetainedRule,
    RuleSet,
};
pub use validate::{Partition, RemovalRecord, validate};
