//! Whole-collection datasets: how each payload is parsed and stored.

use async_trait::async_trait;
use planit_core::entities::{Catalogs, Course};
use planit_core::enums::Dataset;
use planit_core::meta::{CATALOG_SYNC_KEYS, COURSE_SYNC_KEYS, SyncMetaKeys};
use planit_db::{PlanitDb, StoreError};
use serde_json::Value;

/// A dataset published as one file and replaced wholesale on each sync.
#[async_trait]
pub trait Snapshot: Send + Sync + 'static {
    const DATASET: Dataset;
    /// File name under the remote data base URL.
    const FILE: &'static str;
    const KEYS: SyncMetaKeys;

    type Records: Send + Sync;

    /// Parse a response body. The error is a human readable reason.
    fn parse(body: &str) -> Result<Self::Records, String>;

    /// Number recorded under the dataset's count key.
    fn count(records: &Self::Records) -> usize;

    /// Write every record in one transaction.
    async fn persist(store: &PlanitDb, records: &Self::Records) -> Result<(), StoreError>;
}

/// `courseData.json`: an object keyed by course code, or an array of courses.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourseSnapshot;

/// `catalogs.json`: an object keyed by catalog id.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogSnapshot;

#[async_trait]
impl Snapshot for CourseSnapshot {
    const DATASET: Dataset = Dataset::Courses;
    const FILE: &'static str = "courseData.json";
    const KEYS: SyncMetaKeys = COURSE_SYNC_KEYS;

    type Records = Vec<Course>;

    fn parse(body: &str) -> Result<Vec<Course>, String> {
        let value: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
        parse_courses(value)
    }

    fn count(records: &Vec<Course>) -> usize {
        records.len()
    }

    async fn persist(store: &PlanitDb, records: &Vec<Course>) -> Result<(), StoreError> {
        store.put_courses(records).await
    }
}

#[async_trait]
impl Snapshot for CatalogSnapshot {
    const DATASET: Dataset = Dataset::Catalogs;
    const FILE: &'static str = "catalogs.json";
    const KEYS: SyncMetaKeys = CATALOG_SYNC_KEYS;

    type Records = Catalogs;

    fn parse(body: &str) -> Result<Catalogs, String> {
        serde_json::from_str::<Catalogs>(body)
            .map_err(|e| format!("expected an object keyed by catalog id: {e}"))
    }

    fn count(records: &Catalogs) -> usize {
        records.len()
    }

    async fn persist(store: &PlanitDb, records: &Catalogs) -> Result<(), StoreError> {
        store.put_catalogs(records).await
    }
}

/// Accept either course payload layout.
///
/// Object entries with no `code` take their key as the code. A record that
/// still has no code rejects the whole payload.
pub fn parse_courses(value: Value) -> Result<Vec<Course>, String> {
    let courses = match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| {
                let mut course: Course =
                    serde_json::from_value(value).map_err(|e| format!("course {key}: {e}"))?;
                if course.code.is_empty() {
                    course.code = key;
                }
                Ok(course)
            })
            .collect::<Result<Vec<_>, String>>()?,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<Course>(value)
                    .map_err(|e| format!("course #{index}: {e}"))
            })
            .collect::<Result<Vec<_>, String>>()?,
        other => {
            return Err(format!(
                "expected an object or array of courses, got {}",
                kind(&other)
            ));
        }
    };

    if let Some(position) = courses.iter().position(|course| course.code.is_empty()) {
        return Err(format!("course #{position} has no code"));
    }
    Ok(courses)
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn object_keys_fill_missing_codes() {
        let courses = parse_courses(json!({
            "104031": {"name": "Calc 1"},
            "234114": {"code": "234114", "name": "Intro"}
        }))
        .unwrap();
        let codes: Vec<_> = courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["104031", "234114"]);
    }

    #[test]
    fn arrays_are_accepted() {
        let raw = json!([{"code": "1"}, {"code": "2", "points": "3.5"}]);
        let courses = parse_courses(raw).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].points, Some(3.5));
    }

    #[test]
    fn array_entry_without_code_rejects_payload() {
        let err = parse_courses(json!([{"code": "1"}, {"name": "orphan"}])).unwrap_err();
        assert_eq!(err, "course #1 has no code");
    }

    #[test]
    fn scalars_are_rejected() {
        let err = parse_courses(json!("nope")).unwrap_err();
        assert!(err.contains("a string"), "{err}");
    }

    #[test]
    fn catalogs_count_top_level_ids() {
        let catalogs = CatalogSnapshot::parse(r#"{"2024_200": {}, "2025_200": {}}"#).unwrap();
        assert_eq!(CatalogSnapshot::count(&catalogs), 2);
        assert!(CatalogSnapshot::parse("[]").is_err());
    }
}
