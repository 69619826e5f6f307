use clap::Subcommand;

/// Catalog commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CatalogCommands {
    /// List catalog ids.
    List,
    /// List the faculties of a catalog.
    Faculties { catalog_id: String },
    /// List the programs of one faculty.
    Programs {
        catalog_id: String,
        faculty_id: String,
    },
}
