use std::sync::Arc;

use planit_core::enums::Dataset;
use planit_sync::{CatalogSync, CourseSync, SyncError, SyncReport, SyncRunner, SyncStatus};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SyncArgs, SyncTarget};
use crate::context::AppContext;
use crate::output::output;

/// One line of `planit sync` output.
#[derive(Debug, Serialize)]
struct SyncOutcome {
    dataset: Dataset,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SyncOutcome {
    fn from_result(dataset: Dataset, result: &Result<SyncReport, SyncError>) -> Self {
        match result {
            Ok(report) => Self {
                dataset: report.dataset,
                status: match report.status {
                    SyncStatus::Updated => "updated",
                    SyncStatus::Skipped => "skipped",
                    SyncStatus::Offline => "offline",
                },
                count: report.count,
                error: None,
            },
            Err(error) => Self {
                dataset,
                status: "failed",
                count: None,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Handle `planit sync`.
pub async fn handle(args: &SyncArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut runner = SyncRunner::new(ctx.sync.connectivity.clone());
    let mut datasets = Vec::new();
    if matches!(args.target, SyncTarget::Courses | SyncTarget::All) {
        runner = runner.with_job(Arc::new(CourseSync::new(ctx.sync.clone())));
        datasets.push(Dataset::Courses);
    }
    if matches!(args.target, SyncTarget::Catalogs | SyncTarget::All) {
        runner = runner.with_job(Arc::new(CatalogSync::new(ctx.sync.clone())));
        datasets.push(Dataset::Catalogs);
    }

    let results = runner.run_once().await;
    let outcomes = datasets
        .into_iter()
        .zip(results.iter())
        .map(|(dataset, result)| SyncOutcome::from_result(dataset, result))
        .collect::<Vec<_>>();
    output(&outcomes, flags.format)?;

    let failed = outcomes.iter().filter(|outcome| outcome.error.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{failed} dataset(s) failed to sync");
    }
    Ok(())
}
