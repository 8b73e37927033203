//! The export pipeline: retrieval, integrity check, manifest assembly.

use std::collections::HashSet;

use serde_json::Value;
use studypack_integrity::{IntegrityChecker, IssueReport, RemovalRecord};
use studypack_manifest::{AVAILABLE_OBJECTS, Manifest, ManifestRequest, assemble};
use studypack_model::{Entity, SchemaCatalog};
use tracing::{debug, info};

use crate::closure::{ClosureRegistry, ExportContext, Selector};
use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::source::EntitySource;

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub manifest: Manifest,
    /// Entities left out of the manifest, with the reasons.
    pub removed: Vec<RemovalRecord>,
}

impl ExportOutcome {
    pub fn report(&self) -> IssueReport {
        IssueReport::from_removed(&self.removed)
    }

    pub fn has_issues(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Computes export manifests against an [`EntitySource`].
pub struct ExportPipeline<S> {
    source: S,
    config: ExportConfig,
    registry: ClosureRegistry,
}

impl<S: EntitySource> ExportPipeline<S> {
    /// Creates a pipeline with the standard closure registry.
    pub fn new(source: S, config: ExportConfig) -> Self {
        Self {
            source,
            config,
            registry: ClosureRegistry::standard(),
        }
    }

    pub fn with_registry(mut self, registry: ClosureRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub async fn load_catalog(&self) -> ExportResult<SchemaCatalog> {
        let schemas = self.source.list_schemas().await?;
        debug!("Loaded {} object schemas", schemas.len());
        Ok(SchemaCatalog::new(&schemas))
    }

    /// Exports a study.
    ///
    /// Without a request, the first study in the org is exported with every
    /// available type selected by study id. With a request, only the
    /// requested types are exported, selected by unique key, and references
    /// out of the requested types are not checked.
    pub async fn export_study(&self, request: Option<&ManifestRequest>) -> ExportResult<ExportOutcome> {
        let catalog = self.load_catalog().await?;

        let (selections, ignore) = match request {
            Some(request) => {
                for object in request.types() {
                    if !catalog.contains(object) {
                        return Err(ExportError::InvalidArgument(format!(
                            "{object} is not an object in this org"
                        )));
                    }
                }
                let selections: Vec<(String, Selector)> = request
                    .types()
                    .map(|t| (t.to_string(), Selector::Keys(request.includes(t).to_vec())))
                    .collect();
                let ignore: HashSet<String> = request.types().map(str::to_string).collect();
                (selections, ignore)
            }
            None => {
                let study_id = self.study_id(&catalog).await?;
                info!("Exporting study {}", study_id);
                let selections: Vec<(String, Selector)> = AVAILABLE_OBJECTS
                    .iter()
                    .map(|t| (t.to_string(), Selector::Study(study_id.clone())))
                    .collect();
                (selections, HashSet::new())
            }
        };

        let entities = self.collect(&catalog, &selections).await?;
        self.finish(&catalog, &entities, &ignore)
    }

    /// Exports tasks with their steps and branches.
    pub async fn export_tasks(&self, ids: &[String]) -> ExportResult<ExportOutcome> {
        self.export_by_ids("c_task", ids).await
    }

    /// Exports consent templates with their knowledge checks and the default css.
    pub async fn export_consents(&self, ids: &[String]) -> ExportResult<ExportOutcome> {
        self.export_by_ids("ec__document_template", ids).await
    }

    pub async fn export_visit_schedules(&self, ids: &[String]) -> ExportResult<ExportOutcome> {
        self.export_by_ids("c_visit_schedule", ids).await
    }

    pub async fn export_groups(&self, ids: &[String]) -> ExportResult<ExportOutcome> {
        self.export_by_ids("c_group", ids).await
    }

    /// Exports records of `object` by id. References out of `object` itself
    /// are not checked, since its targets live outside the export.
    async fn export_by_ids(&self, object: &str, ids: &[String]) -> ExportResult<ExportOutcome> {
        let catalog = self.load_catalog().await?;
        let selections = vec![(object.to_string(), Selector::Ids(ids.to_vec()))];
        let entities = self.collect(&catalog, &selections).await?;
        let ignore = HashSet::from([object.to_string()]);
        self.finish(&catalog, &entities, &ignore)
    }

    async fn study_id(&self, catalog: &SchemaCatalog) -> ExportResult<String> {
        let root = &self.config.root_type;
        let plural_name = catalog.plural_of(root)?;
        let study = self.source.first(plural_name).await?;
        study
            .as_ref()
            .and_then(|s| s.get("_id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ExportError::InvalidArgument(format!("no {root} found in the org")))
    }

    async fn collect(
        &self,
        catalog: &SchemaCatalog,
        selections: &[(String, Selector)],
    ) -> ExportResult<Vec<Entity>> {
        let ctx = ExportContext::new(&self.source, catalog);
        let mut entities = Vec::new();
        for (object, selector) in selections {
            let found = self
                .registry
                .get(object)
                .collect(&ctx, object, selector)
                .await?;
            debug!("{} selected {} candidate records", object, found.len());
            entities.extend(found);
        }
        Ok(entities)
    }

    fn finish(
        &self,
        catalog: &SchemaCatalog,
        entities: &[Entity],
        ignore: &HashSet<String>,
    ) -> ExportResult<ExportOutcome> {
        let checker = IntegrityChecker::new(catalog, self.config.rules());
        let partition = checker.check(entities, ignore)?;

        info!("Building manifest");
        let manifest = assemble(&partition.kept, catalog, &self.config.assembly_options())?;

        Ok(ExportOutcome {
            manifest,
            removed: partition.removed,
        })
    }
}
