use anyhow::{Context, bail};
use planit_core::entities::{RequirementRecord, RequirementsSelection};
use planit_core::requirements::{collect_groups, count_unique_courses, filter_by_path, path_options};
use planit_state::{DegreeProvider, RequirementProvider};
use planit_sync::{RequirementsSyncOptions, RequirementsSyncResult};
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RequirementsCommands;
use crate::context::AppContext;
use crate::output::output;

/// The selected program and its stored tree.
pub async fn active_requirement(
    ctx: &AppContext,
) -> anyhow::Result<(RequirementsSelection, RequirementRecord)> {
    let selection = ctx
        .provider
        .user_degree()
        .await?
        .context("no degree selected; run 'planit requirements sync' first")?;
    let record = ctx
        .provider
        .requirement(&selection.program_id)
        .await?
        .with_context(|| {
            format!(
                "requirements for program '{}' are not cached; run 'planit requirements sync'",
                selection.program_id
            )
        })?;
    Ok((selection, record))
}

/// Handle `planit requirements`.
pub async fn handle(
    action: &RequirementsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RequirementsCommands::Show { path, groups } => {
            let (selection, record) = active_requirement(ctx).await?;
            let path = path.as_deref().or(selection.path.as_deref());
            let tree = filter_by_path(&record.data, path);

            if *groups {
                return output(&collect_groups(&tree), flags.format);
            }
            output(
                &json!({
                    "catalog_id": record.catalog_id,
                    "faculty_id": record.faculty_id,
                    "program_id": record.program_id,
                    "path": path,
                    "unique_courses": count_unique_courses(&tree),
                    "tree": tree,
                }),
                flags.format,
            )
        }
        RequirementsCommands::Sync { selection, preview } => {
            let selection = selection.to_selection();
            let options = if *preview {
                RequirementsSyncOptions::preview()
            } else {
                RequirementsSyncOptions::default()
            };
            let result = ctx.provider.sync_requirements(&selection, options).await?;
            output(&result, flags.format)?;
            if let RequirementsSyncResult::Failed { error } = result {
                bail!("requirements sync failed: {error}");
            }
            Ok(())
        }
        RequirementsCommands::Paths => {
            let (_, record) = active_requirement(ctx).await?;
            output(&path_options(&record.data), flags.format)
        }
    }
}
