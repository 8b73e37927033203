//! File handling behind the `studypack` binary: snapshot and config loading,
//! manifest request parsing, and report writing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use studypack_export::{
    EntitySource, ExportConfig, ExportOutcome, ExportPipeline, MemorySource, Snapshot,
};
use studypack_manifest::ManifestRequest;
use tracing::info;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const ISSUES_FILE: &str = "issuesReport.json";
pub const DETAILED_ISSUES_FILE: &str = "detailedIssuesReport.json";

/// Types a command-line manifest may select.
pub const REQUESTABLE_OBJECTS: &[&str] = &["c_task", "ec__document_template"];

/// What to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// The whole study, or the part a manifest request selects.
    Study(Option<ManifestRequest>),
    Tasks(Vec<String>),
    Consents(Vec<String>),
    VisitSchedules(Vec<String>),
    Groups(Vec<String>),
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Loads the export config, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    let Some(path) = path else {
        return Ok(ExportConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Reads a manifest request given inline as JSON or as a path to a JSON
/// file, keeping only tasks and consent templates.
pub fn read_manifest_request(arg: &str) -> Result<ManifestRequest> {
    let value = match serde_json::from_str::<Value>(arg) {
        Ok(value) => value,
        Err(_) => {
            let path = Path::new(arg);
            if !path.exists() {
                bail!("The manifest file does not exist");
            }
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest {}", path.display()))?;
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) => bail!("The manifest is not a valid JSON"),
            }
        }
    };

    // Narrowed before the includes are checked; other types are dropped unread.
    let request = ManifestRequest::parse_with(&value, REQUESTABLE_OBJECTS)?;
    if request.is_empty() {
        bail!("No Assignments or eConsents to export");
    }
    Ok(request)
}

/// Runs the pipeline operation matching `kind`.
pub async fn run_export<S: EntitySource>(
    pipeline: &ExportPipeline<S>,
    kind: &ExportKind,
) -> Result<ExportOutcome> {
    let outcome = match kind {
        ExportKind::Study(request) => pipeline.export_study(request.as_ref()).await,
        ExportKind::Tasks(ids) => pipeline.export_tasks(ids).await,
        ExportKind::Consents(ids) => pipeline.export_consents(ids).await,
        ExportKind::VisitSchedules(ids) => pipeline.export_visit_schedules(ids).await,
        ExportKind::Groups(ids) => pipeline.export_groups(ids).await,
    };
    outcome.map_err(|e| {
        let reason = e.reason().map(str::to_string);
        match reason {
            Some(reason) => anyhow::anyhow!("{e}: {reason}"),
            None => e.into(),
        }
    })
}

/// Loads a snapshot, exports from it, and writes the results into `out_dir`.
pub async fn export_snapshot(
    snapshot: &Path,
    config: ExportConfig,
    kind: &ExportKind,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let source = MemorySource::new(load_snapshot(snapshot)?);
    let pipeline = ExportPipeline::new(source, config);
    let outcome = run_export(&pipeline, kind).await?;
    write_outputs(&outcome, out_dir)
}

/// Writes the manifest, plus both issue reports when anything was removed.
/// Returns the paths written.
pub fn write_outputs(outcome: &ExportOutcome, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();

    let manifest_path = out_dir.join(MANIFEST_FILE);
    write_file(&manifest_path, &outcome.manifest.to_json_pretty()?)?;
    written.push(manifest_path);

    let report = outcome.report();
    if !report.is_empty() {
        info!("{} entities removed from export; writing issue reports", report.detailed.len());

        let issues_path = out_dir.join(ISSUES_FILE);
        write_file(&issues_path, &report.issues_json()?)?;
        written.push(issues_path);

        let detailed_path = out_dir.join(DETAILED_ISSUES_FILE);
        write_file(&detailed_path, &report.detailed_json()?)?;
        written.push(detailed_path);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
