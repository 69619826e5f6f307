use std::path::Path;

use anyhow::Context;
use planit_core::entities::PlanState;
use planit_state::{CourseProvider, PlanProvider};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PlanCommands;
use crate::context::AppContext;
use crate::output::output;

async fn read_plan(file: &Path) -> anyhow::Result<PlanState> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    PlanState::from_value(value).with_context(|| format!("{} is not a plan", file.display()))
}

/// Handle `planit plan`.
pub async fn handle(
    action: &PlanCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PlanCommands::Show => output(&ctx.provider.user_plan().await?, flags.format),
        PlanCommands::Set { file } => {
            let plan = read_plan(file).await?;
            for code in plan.planned_course_codes() {
                if ctx.provider.course(code).await?.is_none() {
                    tracing::warn!(code, "planned course is not in the local cache");
                }
            }
            ctx.provider.set_user_plan(&plan).await?;
            output(&plan, flags.format)
        }
    }
}
