use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All catalogs, keyed by catalog id (`{year}_{session}`).
pub type Catalogs = BTreeMap<String, Value>;

/// One catalog as stored in the `catalogs` collection.
///
/// `data` is the nested faculty -> program map. Each level may carry `he`/`en`
/// label strings next to its children.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CatalogRecord {
    pub id: String,
    pub data: Value,
}

/// A faculty or program with its resolved display label.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

fn is_label_key(key: &str) -> bool {
    key == "en" || key == "he"
}

fn node_label(value: &Value, fallback: &str) -> String {
    ["he", "en"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .find(|label| !label.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn child_entries(container: Option<&Value>) -> Vec<CatalogEntry> {
    let Some(Value::Object(map)) = container else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| !is_label_key(key))
        .map(|(id, value)| CatalogEntry {
            id: id.clone(),
            label: node_label(value, id),
        })
        .collect()
}

/// Faculties of one catalog, skipping the catalog's own label keys.
#[must_use]
pub fn catalog_faculties(catalog: &Value) -> Vec<CatalogEntry> {
    child_entries(Some(catalog))
}

/// Programs of one faculty within a catalog.
#[must_use]
pub fn catalog_programs(catalog: &Value, faculty_id: &str) -> Vec<CatalogEntry> {
    child_entries(catalog.get(faculty_id))
}
