use clap::{Args, Subcommand};
use planit_core::entities::RequirementsSelection;

/// Positional catalog/faculty/program triple plus an optional path.
#[derive(Clone, Debug, Args)]
pub struct SelectionArgs {
    pub catalog_id: String,
    pub faculty_id: String,
    pub program_id: String,
    /// Track within the program
    #[arg(long)]
    pub path: Option<String>,
}

impl SelectionArgs {
    #[must_use]
    pub fn to_selection(&self) -> RequirementsSelection {
        RequirementsSelection::new(
            self.catalog_id.clone(),
            self.faculty_id.clone(),
            self.program_id.clone(),
            self.path.clone(),
        )
    }
}

/// Requirement tree commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RequirementsCommands {
    /// Show the active program's requirement tree.
    Show {
        /// Track to show instead of the active path
        #[arg(long)]
        path: Option<String>,
        /// Flatten into course groups
        #[arg(long)]
        groups: bool,
    },
    /// Download a program's requirement tree.
    Sync {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Store the tree without making it the active selection
        #[arg(long)]
        preview: bool,
    },
    /// List the selectable tracks of the active program.
    Paths,
}
