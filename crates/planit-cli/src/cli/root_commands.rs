use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{
    CatalogCommands, CourseCommands, DegreeCommands, PlanCommands, RequirementsCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sync datasets from the published data files.
    Sync(SyncArgs),
    /// Courses in the local cache.
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },
    /// Catalogs, faculties and programs.
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
    /// Degree requirement trees.
    Requirements {
        #[command(subcommand)]
        action: RequirementsCommands,
    },
    /// The selected degree.
    Degree {
        #[command(subcommand)]
        action: DegreeCommands,
    },
    /// The saved semester plan.
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },
    /// Print the JSON Schema of a record type.
    Schema(SchemaArgs),
}

/// Which whole-collection datasets `planit sync` runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SyncTarget {
    Courses,
    Catalogs,
    #[default]
    All,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Dataset to sync
    #[arg(value_enum, default_value_t = SyncTarget::All)]
    pub target: SyncTarget,
}

/// Record types with a published schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Course,
    Catalog,
    Requirement,
    Selection,
    Plan,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Record type
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
