use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One node of a program's requirement tree.
///
/// A node lists course codes directly (`courses`), groups child requirements
/// (`nested`), or both. `he`/`en` are display labels; `name` is the stable id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RequirementNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Vec<RequirementNode>>,
}

impl RequirementNode {
    /// Directly listed course codes.
    #[must_use]
    pub fn courses(&self) -> &[String] {
        self.courses.as_deref().unwrap_or_default()
    }

    /// Child requirements.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.nested.as_deref().unwrap_or_default()
    }
}

/// The requirement tree of one program, keyed by program id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRecord {
    pub program_id: String,
    pub catalog_id: String,
    pub faculty_id: String,
    /// Selected sub-track, if the program has tracks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub data: RequirementNode,
}

/// Catalog, faculty, program, and optional track a user has chosen.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsSelection {
    pub catalog_id: String,
    pub faculty_id: String,
    pub program_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RequirementsSelection {
    /// Build a selection, treating an empty path as "no path".
    #[must_use]
    pub fn new(
        catalog_id: impl Into<String>,
        faculty_id: impl Into<String>,
        program_id: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            faculty_id: faculty_id.into(),
            program_id: program_id.into(),
            path: path.filter(|p| !p.is_empty()),
        }
    }

    /// Catalog, faculty, and program ids are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.catalog_id.is_empty() && !self.faculty_id.is_empty() && !self.program_id.is_empty()
    }

    /// Wrap a fetched tree into the record stored for this selection.
    #[must_use]
    pub fn into_record(self, data: RequirementNode) -> RequirementRecord {
        RequirementRecord {
            program_id: self.program_id,
            catalog_id: self.catalog_id,
            faculty_id: self.faculty_id,
            path: self.path,
            data,
        }
    }
}
