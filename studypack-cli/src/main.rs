//! studypack: computes a study export manifest from an org snapshot.
//!
//! The snapshot is a JSON file holding every object schema and every record
//! of the org. The manifest, and the issue reports when anything had to be
//! left out, are written to the output directory.
//!
//! Usage:
//!   studypack export --snapshot org.json --out ./export
//!   studypack export --snapshot org.json --tasks <id>,<id>

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use studypack_cli::{ExportKind, export_snapshot, load_config, read_manifest_request};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "studypack")]
#[command(about = "Study export manifest builder")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the study, or the tasks/consents/visit schedules/groups given
    #[command(group(
        ArgGroup::new("selection")
            .args(["manifest", "tasks", "consents", "visit_schedules", "groups"])
    ))]
    Export {
        /// Org snapshot: `{ "schemas": [...], "records": [...] }`
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Manifest selecting tasks and consents by key (JSON text or file path)
        #[arg(short, long)]
        manifest: Option<String>,

        /// Task ids to export
        #[arg(long, value_delimiter = ',')]
        tasks: Vec<String>,

        /// Consent template ids to export
        #[arg(long, value_delimiter = ',')]
        consents: Vec<String>,

        /// Visit schedule ids to export
        #[arg(long, value_delimiter = ',')]
        visit_schedules: Vec<String>,

        /// Group ids to export
        #[arg(long, value_delimiter = ',')]
        groups: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Export config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Export {
            snapshot,
            manifest,
            tasks,
            consents,
            visit_schedules,
            groups,
            out,
            config,
        } => {
            let kind = if let Some(manifest) = manifest {
                ExportKind::Study(Some(read_manifest_request(&manifest)?))
            } else if !tasks.is_empty() {
                ExportKind::Tasks(tasks)
            } else if !consents.is_empty() {
                ExportKind::Consents(consents)
            } else if !visit_schedules.is_empty() {
                ExportKind::VisitSchedules(visit_schedules)
            } else if !groups.is_empty() {
                ExportKind::Groups(groups)
            } else {
                ExportKind::Study(None)
            };

            let config = load_config(config.as_deref())?;
            info!("Starting export from {}", snapshot.display());
            let written = export_snapshot(&snapshot, config, &kind, &out).await?;
            for path in &written {
                info!("Wrote {}", path.display());
            }
            info!("Export finished");
        }
    }

    Ok(())
}
