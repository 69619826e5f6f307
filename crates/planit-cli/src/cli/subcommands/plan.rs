use std::path::PathBuf;

use clap::Subcommand;

/// Semester plan commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PlanCommands {
    /// Show the saved plan.
    Show,
    /// Replace the saved plan with a JSON file.
    Set { file: PathBuf },
}
