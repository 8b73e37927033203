use std::collections::HashSet;

use studypack_model::{Entity, SchemaCatalog};
use tracing::warn;

use crate::cascade::cascade;
use crate::error::IntegrityResult;
use crate::rules::RuleSet;
use crate::validate::{Partition, validate};

/// Runs validation, the dependency cascade, and the export rules against
/// one run's catalog.
pub struct IntegrityChecker<'a> {
    catalog: &'a SchemaCatalog,
    rules: RuleSet,
}

impl<'a> IntegrityChecker<'a> {
    pub fn new(catalog: &'a SchemaCatalog, rules: RuleSet) -> Self {
        Self { catalog, rules }
    }

    /// Returns the settled partition, or the first fatal rule violation.
    pub fn check(&self, entities: &[Entity], ignore: &HashSet<String>) -> IntegrityResult<Partition> {
        let validated = validate(entities, self.catalog, ignore)?;
        let outcome = cascade(validated)?;

        self.rules.check(&outcome.partition)?;

        if outcome.partition.has_issues() {
            warn!(
                "Referential integrity errors found: {} entities removed from export",
                outcome.partition.removed.len()
            );
        }

        Ok(outcome.partition)
    }
}
