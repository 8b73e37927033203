//! Closure strategies: what to fetch when a type is selected for export.
//!
//! Selecting a task means exporting its steps and branches too; selecting a
//! consent template brings its knowledge checks and the default css. Each
//! such rule is a [`ClosureStrategy`] registered under the selected type's
//! name in a [`ClosureRegistry`]. Unregistered types export whole.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use studypack_model::{Entity, SchemaCatalog, projection_paths};
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::source::{EntitySource, Filter};

const ID_FIELD: &str = "_id";

/// Read-only handles shared by every strategy during one export run.
pub struct ExportContext<'a> {
    pub source: &'a dyn EntitySource,
    pub catalog: &'a SchemaCatalog,
}

impl<'a> ExportContext<'a> {
    pub fn new(source: &'a dyn EntitySource, catalog: &'a SchemaCatalog) -> Self {
        Self { source, catalog }
    }

    /// Fetches the records of a collection as entities, projected to the
    /// type's unique key and reference paths.
    ///
    /// Returns nothing for a collection the catalog does not know. Fails
    /// with [`ExportError::Fault`] if the store answers with a fault.
    pub async fn fetch_objects(&self, plural_name: &str, filter: &Filter) -> ExportResult<Vec<Entity>> {
        let Some(summary) = self.catalog.by_plural(plural_name) else {
            debug!("{} is not available in the org", plural_name);
            return Ok(Vec::new());
        };

        let mut paths: Vec<String> = summary.unique_key.iter().cloned().collect();
        paths.extend(projection_paths(self.catalog.reference_specs(&summary.name)));

        debug!("Getting {}", plural_name);
        let records = self.source.find(plural_name, filter, &paths).await?;

        if let Some(first) = records.first()
            && first.get("object").and_then(Value::as_str) == Some("fault")
        {
            return Err(ExportError::Fault(fault_reason(first)));
        }

        records
            .into_iter()
            .map(|record| Entity::from_value(record).map_err(ExportError::from))
            .collect()
    }

    /// Ids of the records of `object` matching `filter`.
    pub async fn find_ids(&self, object: &str, filter: &Filter) -> ExportResult<Vec<String>> {
        let Ok(plural_name) = self.catalog.plural_of(object) else {
            return Ok(Vec::new());
        };
        let records = self.source.find(plural_name, filter, &[]).await?;
        Ok(records
            .iter()
            .filter_map(|r| r.get(ID_FIELD).and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

fn fault_reason(fault: &Value) -> String {
    ["reason", "message", "errCode", "code"]
        .iter()
        .find_map(|k| fault.get(*k).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| fault.to_string())
}

/// Field names a type uses to point at its study and to hold its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorFields {
    pub study: &'static str,
    pub key: &'static str,
}

pub const STUDY_FIELDS: SelectorFields = SelectorFields {
    study: "c_study",
    key: "c_key",
};

/// Consent types are namespaced `ec__`.
pub const CONSENT_FIELDS: SelectorFields = SelectorFields {
    study: "ec__study",
    key: "ec__key",
};

/// How the seed records of a selected type are picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every record belonging to the study with this id.
    Study(String),
    /// Records whose unique key is one of these.
    Keys(Vec<String>),
    /// Records with these ids.
    Ids(Vec<String>),
}

impl Selector {
    pub fn filter(&self, fields: SelectorFields) -> Filter {
        match self {
            Self::Study(id) => Filter::is_in(fields.study, vec![id.clone()]),
            Self::Keys(keys) => Filter::is_in(fields.key, keys.clone()),
            Self::Ids(ids) => Filter::is_in(ID_FIELD, ids.clone()),
        }
    }
}

/// Produces the candidate entities for one selected type.
#[async_trait]
pub trait ClosureStrategy: Send + Sync {
    async fn collect(
        &self,
        ctx: &ExportContext<'_>,
        object: &str,
        selector: &Selector,
    ) -> ExportResult<Vec<Entity>>;
}

/// A collection whose records point at the seed records through `parent_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependents {
    pub plural_name: String,
    pub parent_field: String,
}

impl Dependents {
    pub fn new(plural_name: &str, parent_field: &str) -> Self {
        Self {
            plural_name: plural_name.into(),
            parent_field: parent_field.into(),
        }
    }
}

/// Seeds by id, then pulls every dependent collection pointing at the seeds
/// and every shared collection in full.
#[derive(Debug, Clone)]
pub struct SeededClosure {
    fields: SelectorFields,
    dependents: Vec<Dependents>,
    shared: Vec<String>,
}

impl SeededClosure {
    pub fn new(fields: SelectorFields) -> Self {
        Self {
            fields,
            dependents: Vec::new(),
            shared: Vec::new(),
        }
    }

    pub fn with_dependents(mut self, plural_name: &str, parent_field: &str) -> Self {
        self.dependents.push(Dependents::new(plural_name, parent_field));
        self
    }

    /// A collection exported whole whenever this type is selected.
    pub fn with_shared(mut self, plural_name: &str) -> Self {
        self.shared.push(plural_name.into());
        self
    }

    /// Steps and branches hang off their task.
    pub fn tasks() -> Self {
        Self::new(STUDY_FIELDS)
            .with_dependents("c_steps", "c_task")
            .with_dependents("c_branches", "c_task")
    }

    /// Knowledge checks hang off their template; the default css is shared.
    pub fn consents() -> Self {
        Self::new(CONSENT_FIELDS)
            .with_dependents("ec__knowledge_checks", "ec__document_template")
            .with_shared("ec__default_document_csses")
    }

    pub fn visit_schedules() -> Self {
        Self::new(STUDY_FIELDS).with_dependents("c_visits", "c_visit_schedules")
    }

    pub fn groups() -> Self {
        Self::new(STUDY_FIELDS).with_dependents("c_group_tasks", "c_group")
    }
}

#[async_trait]
impl ClosureStrategy for SeededClosure {
    async fn collect(
        &self,
        ctx: &ExportContext<'_>,
        object: &str,
        selector: &Selector,
    ) -> ExportResult<Vec<Entity>> {
        let seed_ids = match selector {
            Selector::Ids(ids) => ids.clone(),
            other => ctx.find_ids(object, &other.filter(self.fields)).await?,
        };

        let mut entities = match ctx.catalog.plural_of(object) {
            Ok(plural_name) => {
                ctx.fetch_objects(plural_name, &Filter::is_in(ID_FIELD, seed_ids))
                    .await?
            }
            Err(_) => Vec::new(),
        };

        let parents: Vec<String> = entities.iter().map(|e| e.id.to_string()).collect();
        for dependents in &self.dependents {
            let filter = Filter::is_in(&dependents.parent_field, parents.clone());
            let found = ctx.fetch_objects(&dependents.plural_name, &filter).await?;
            entities.extend(found);
        }

        for plural_name in &self.shared {
            entities.extend(ctx.fetch_objects(plural_name, &Filter::All).await?);
        }

        Ok(entities)
    }
}

/// Fetches the selected records themselves; they own nothing.
#[derive(Debug, Clone, Copy)]
pub struct DirectClosure {
    fields: SelectorFields,
}

impl DirectClosure {
    pub fn new(fields: SelectorFields) -> Self {
        Self { fields }
    }
}

#[async_trait]
impl ClosureStrategy for DirectClosure {
    async fn collect(
        &self,
        ctx: &ExportContext<'_>,
        object: &str,
        selector: &Selector,
    ) -> ExportResult<Vec<Entity>> {
        let Ok(plural_name) = ctx.catalog.plural_of(object) else {
            return Ok(Vec::new());
        };
        ctx.fetch_objects(plural_name, &selector.filter(self.fields))
            .await
    }
}

/// Exports every record of the type, ignoring the selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeTypeClosure;

#[async_trait]
impl ClosureStrategy for WholeTypeClosure {
    async fn collect(
        &self,
        ctx: &ExportContext<'_>,
        object: &str,
        _selector: &Selector,
    ) -> ExportResult<Vec<Entity>> {
        // Some selectable names are already plural.
        let plural_name = ctx.catalog.plural_of(object).unwrap_or(object);
        ctx.fetch_objects(plural_name, &Filter::All).await
    }
}

/// Closure strategies by type name.
#[derive(Clone)]
pub struct ClosureRegistry {
    strategies: HashMap<String, Arc<dyn ClosureStrategy>>,
    fallback: Arc<dyn ClosureStrategy>,
}

impl Default for ClosureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosureRegistry {
    /// A registry that exports every type whole.
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: Arc::new(WholeTypeClosure),
        }
    }

    /// The study export closures.
    pub fn standard() -> Self {
        Self::new()
            .register("c_task", SeededClosure::tasks())
            .register("ec__document_template", SeededClosure::consents())
            .register("c_visit_schedule", SeededClosure::visit_schedules())
            .register("c_group", SeededClosure::groups())
            .register("c_site", DirectClosure::new(STUDY_FIELDS))
            .register("c_anchor_date_template", DirectClosure::new(STUDY_FIELDS))
    }

    pub fn register(mut self, object: &str, strategy: impl ClosureStrategy + 'static) -> Self {
        self.strategies.insert(object.into(), Arc::new(strategy));
        self
    }

    pub fn is_registered(&self, object: &str) -> bool {
        self.strategies.contains_key(object)
    }

    /// The strategy for `object`, or the whole-type fallback.
    pub fn get(&self, object: &str) -> &dyn ClosureStrategy {
        self.strategies
            .get(object)
            .map(Arc::as_ref)
            .unwrap_or(self.fallback.as_ref())
    }
}
