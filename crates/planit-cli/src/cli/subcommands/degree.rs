use clap::Subcommand;

use super::SelectionArgs;

/// Degree selection commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DegreeCommands {
    /// Show the selected degree.
    Show,
    /// Select a degree.
    Set {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}
