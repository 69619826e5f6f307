use anyhow::Context;
use planit_core::entities::{Catalogs, catalog_faculties, catalog_programs};
use planit_state::CatalogProvider;
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CatalogCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CatalogSummary<'a> {
    id: &'a str,
    faculties: usize,
}

fn summarize(catalogs: &Catalogs) -> Vec<CatalogSummary<'_>> {
    catalogs
        .iter()
        .map(|(id, catalog)| CatalogSummary {
            id,
            faculties: catalog_faculties(catalog).len(),
        })
        .collect()
}

fn find<'a>(catalogs: &'a Catalogs, catalog_id: &str) -> anyhow::Result<&'a Value> {
    catalogs
        .get(catalog_id)
        .with_context(|| format!("catalog '{catalog_id}' not found; run 'planit sync catalogs'"))
}

/// Handle `planit catalog`.
pub async fn handle(
    action: &CatalogCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let catalogs = ctx.provider.catalogs().await?;

    match action {
        CatalogCommands::List => output(&summarize(&catalogs), flags.format),
        CatalogCommands::Faculties { catalog_id } => {
            let catalog = find(&catalogs, catalog_id)?;
            output(&catalog_faculties(catalog), flags.format)
        }
        CatalogCommands::Programs {
            catalog_id,
            faculty_id,
        } => {
            let catalog = find(&catalogs, catalog_id)?;
            let programs = catalog_programs(catalog, faculty_id);
            if programs.is_empty() {
                tracing::warn!(%catalog_id, %faculty_id, "faculty has no programs");
            }
            output(&programs, flags.format)
        }
    }
}

#[cfg(test)]
mod tests {
    use planit_core::entities::Catalogs;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{CatalogSummary, find, summarize};

    fn catalogs() -> Catalogs {
        Catalogs::from([
            (
                "2024_200".to_string(),
                json!({"he": "2024", "cs": {"en": "CS"}, "math": {"en": "Math"}}),
            ),
            ("2025_200".to_string(), json!({"cs": {"en": "CS"}})),
        ])
    }

    #[test]
    fn summary_counts_faculties_without_label_keys() {
        let catalogs = catalogs();
        assert_eq!(
            summarize(&catalogs),
            vec![
                CatalogSummary {
                    id: "2024_200",
                    faculties: 2
                },
                CatalogSummary {
                    id: "2025_200",
                    faculties: 1
                },
            ]
        );
    }

    #[test]
    fn missing_catalog_points_at_sync() {
        let catalogs = catalogs();
        let error = find(&catalogs, "1999_100").expect_err("catalog is absent");
        assert!(error.to_string().contains("planit sync catalogs"));
    }
}
