//! Manifest assembly from the final kept entity set.

use serde::Deserialize;
use studypack_model::{Entity, SchemaCatalog};
use tracing::{debug, warn};

use crate::error::ManifestResult;
use crate::manifest::{Manifest, STUDY_DEFER_PATHS, STUDY_TYPE};

/// What to do when the same unique key shows up twice for one type, e.g.
/// when a record was reached through two different closure paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludePolicy {
    /// Keep the first occurrence only.
    #[default]
    Deduplicate,
    /// Keep every occurrence in the order supplied.
    KeepDuplicates,
}

/// Options for [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Type that carries the `defer` list when present.
    pub root_type: String,
    /// Field paths resolved at import time for the root type.
    pub defer_paths: Vec<String>,
    pub include_policy: IncludePolicy,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            root_type: STUDY_TYPE.into(),
            defer_paths: STUDY_DEFER_PATHS.iter().map(|p| p.to_string()).collect(),
            include_policy: IncludePolicy::default(),
        }
    }
}

/// Groups `kept` by type and lists each entity's unique key value.
///
/// Keys appear in the order entities were supplied. An entity without a
/// string unique key cannot be addressed by the importer and is left out
/// with a warning. Fails if an entity's type is not in the catalog.
pub fn assemble(
    kept: &[Entity],
    catalog: &SchemaCatalog,
    options: &AssemblyOptions,
) -> ManifestResult<Manifest> {
    let mut manifest = Manifest::new();

    for entity in kept {
        let Some(unique_key) = catalog.unique_key(&entity.object)? else {
            warn!("{} declares no unique key; skipping {}", entity.object, entity.id);
            continue;
        };
        let Some(key) = entity.key(unique_key) else {
            warn!(
                "{} ({}) has no value for unique key {}; skipping",
                entity.object, entity.id, unique_key
            );
            continue;
        };

        let entry = manifest.types.entry(entity.object.clone()).or_default();
        let duplicate = entry.includes.iter().any(|k| k == key);
        if duplicate && options.include_policy == IncludePolicy::Deduplicate {
            debug!("Skipping duplicate {} key {}", entity.object, key);
            continue;
        }
        entry.includes.push(key.to_string());
    }

    if let Some(root) = manifest.types.get_mut(&options.root_type) {
        root.defer = Some(options.defer_paths.clone());
    }

    Ok(manifest)
}
