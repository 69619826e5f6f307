use anyhow::bail;
use planit_state::DegreeProvider;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DegreeCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `planit degree`.
pub async fn handle(
    action: &DegreeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DegreeCommands::Show => output(&ctx.provider.user_degree().await?, flags.format),
        DegreeCommands::Set { selection } => {
            let selection = selection.to_selection();
            if !selection.is_complete() {
                bail!("catalog, faculty and program ids must all be non-empty");
            }
            ctx.provider.set_user_degree(&selection).await?;
            tracing::info!(program_id = %selection.program_id, "degree selected");
            output(&selection, flags.format)
        }
    }
}
