//! Integrity validation - classifies each candidate entity as kept or removed.

use std::collections::HashSet;

use serde::Serialize;
use studypack_model::{Entity, ObjectId, ReferenceSpec, SchemaCatalog};
use tracing::{debug, info};

use crate::error::{IntegrityError, IntegrityResult};
use crate::resolve::{ResolvedReference, resolve};

/// An entity excluded from the export, with every reason it was excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalRecord {
    pub entity: Entity,
    pub issues: Vec<String>,
}

/// The kept/removed split of a candidate set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partition {
    pub kept: Vec<Entity>,
    pub removed: Vec<RemovalRecord>,
}

impl Partition {
    pub fn has_issues(&self) -> bool {
        !self.removed.is_empty()
    }

    /// Removal records of a given type.
    pub fn removed_of_type<'a>(&'a self, object: &'a str) -> impl Iterator<Item = &'a RemovalRecord> {
        self.removed.iter().filter(move |r| r.entity.object == object)
    }

    pub fn keeps_type(&self, object: &str) -> bool {
        self.kept.iter().any(|e| e.object == object)
    }
}

/// Validates every entity's references against the candidate set.
///
/// Types in `ignore` are treated as having no references: their integrity is
/// guaranteed by construction (the selected root of the export). Every
/// violation of every entity is reported; classification of one entity
/// never depends on the classification of another.
pub fn validate(
    entities: &[Entity],
    catalog: &SchemaCatalog,
    ignore: &HashSet<String>,
) -> IntegrityResult<Partition> {
    if let Some(unknown) = entities.iter().find(|e| !catalog.contains(&e.object)) {
        return Err(IntegrityError::InvalidArgument(format!(
            "unknown object {} ({})",
            unknown.object, unknown.id
        )));
    }

    info!("Validating internal references of {} entities", entities.len());

    let index: HashSet<&ObjectId> = entities.iter().map(|e| &e.id).collect();
    let mut partition = Partition::default();

    for entity in entities {
        let specs: &[ReferenceSpec] = if ignore.contains(&entity.object) {
            &[]
        } else {
            catalog.reference_specs(&entity.object)
        };
        let references = resolve(&entity.data, specs);
        let issues = entity_issues(entity, &references, &index);

        if issues.is_empty() {
            partition.kept.push(entity.clone());
        } else {
            debug!(
                "Removing {} ({}) with {} issue(s)",
                entity.object,
                entity.id,
                issues.len()
            );
            partition.removed.push(RemovalRecord {
                entity: entity.clone(),
                issues,
            });
        }
    }

    Ok(partition)
}

fn entity_issues(
    entity: &Entity,
    references: &[ResolvedReference],
    index: &HashSet<&ObjectId>,
) -> Vec<String> {
    let mut issues = Vec::new();

    for reference in references {
        if reference.targets.is_empty() {
            if reference.required {
                issues.push(format!(
                    "No entity id for {} {} for reference {}",
                    entity.object, entity.id, reference.field_name
                ));
            }
            continue;
        }

        for target in &reference.targets {
            if !index.contains(&target.id) {
                issues.push(format!(
                    "The object {} ({}) is removed from export because it depends on {} ({}) which doesn't exist",
                    entity.object, entity.id, target.field_name, target.id
                ));
            }
        }
    }

    issues
}
