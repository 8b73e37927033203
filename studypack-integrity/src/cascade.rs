//! Dependency cascade - propagates removals to dependents until nothing changes.
//!
//! A kept entity that embeds the id of a removed entity anywhere in its
//! record is removed too. Removing it may expose a second-order dependent,
//! so rounds repeat until one produces an empty delta. Every round either
//! shrinks the kept set or ends the loop, so the cascade always terminates.

use std::collections::{HashMap, HashSet};

use studypack_model::{Entity, ObjectId};
use tracing::{debug, info};

use crate::error::IntegrityResult;
use crate::validate::{Partition, RemovalRecord};

/// Result of running the cascade to its fixed point.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub partition: Partition,
    /// Rounds that removed at least one entity. Zero for a fixed point input.
    pub rounds: usize,
}

struct Pending {
    entity: Entity,
    embedded: Vec<ObjectId>,
}

/// Runs cascade rounds until a round removes nothing.
pub fn cascade(partition: Partition) -> IntegrityResult<CascadeOutcome> {
    let Partition { kept, mut removed } = partition;

    // id -> object type of every removed entity
    let mut removed_index: HashMap<ObjectId, String> = removed
        .iter()
        .map(|r| (r.entity.id.clone(), r.entity.object.clone()))
        .collect();

    let mut pending = kept
        .into_iter()
        .map(|entity| {
            let embedded = entity.embedded_ids()?;
            Ok(Pending { entity, embedded })
        })
        .collect::<IntegrityResult<Vec<_>>>()?;

    let mut rounds = 0;
    loop {
        let mut delta = Vec::new();
        let mut survivors = Vec::with_capacity(pending.len());

        for item in pending {
            let issues = dependency_issues(&item, &removed_index);
            if issues.is_empty() {
                survivors.push(item);
            } else {
                delta.push(RemovalRecord {
                    entity: item.entity,
                    issues,
                });
            }
        }
        pending = survivors;

        if delta.is_empty() {
            break;
        }

        rounds += 1;
        debug!("Cascade round {} removed {} entities", rounds, delta.len());
        for record in delta {
            removed_index.insert(record.entity.id.clone(), record.entity.object.clone());
            removed.push(record);
        }
    }

    if rounds > 0 {
        info!("Dependency cascade settled after {} round(s)", rounds);
    }

    Ok(CascadeOutcome {
        partition: Partition {
            kept: pending.into_iter().map(|p| p.entity).collect(),
            removed,
        },
        rounds,
    })
}

fn dependency_issues(item: &Pending, removed_index: &HashMap<ObjectId, String>) -> Vec<String> {
    let mut seen = HashSet::new();
    item.embedded
        .iter()
        .filter(|id| **id != item.entity.id)
        .filter(|id| seen.insert(*id))
        .filter_map(|id| removed_index.get(id).map(|object| (id, object)))
        .map(|(id, object)| {
            format!(
                "The object {} ({}) is removed from export because it depends on {} ({}) which has issues",
                item.entity.object, item.entity.id, object, id
            )
        })
        .collect()
}
