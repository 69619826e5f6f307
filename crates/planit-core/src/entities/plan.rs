use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// Version written by this build.
pub const PLAN_STATE_VERSION: u64 = 3;

/// Oldest version readers still accept.
const MIN_PLAN_STATE_VERSION: u64 = 2;

/// The persisted semester plan (`planPageState` meta entry).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanState {
    pub version: u64,
    pub semester_count: u32,
    /// Index of the semester in progress. Absent before version 3.
    #[serde(default)]
    pub current_semester: u32,
    pub semesters: Vec<PlannedSemester>,
    #[serde(default)]
    pub wishlist_course_codes: Vec<String>,
    #[serde(default)]
    pub exemptions_course_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSemester {
    pub id: String,
    #[serde(default)]
    pub course_codes: Vec<String>,
}

impl PlanState {
    /// Decode a stored payload, checking its embedded version first.
    ///
    /// Version 2 payloads are upgraded in memory (`current_semester = 0`) and
    /// re-stamped as the current version.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedVersion`] for unknown versions,
    /// [`CoreError::Validation`] when the version field is missing or the
    /// semester list disagrees with `semester_count`, and [`CoreError::Json`]
    /// when the shape does not match.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| CoreError::Validation("plan state has no numeric version".into()))?;
        if !(MIN_PLAN_STATE_VERSION..=PLAN_STATE_VERSION).contains(&version) {
            return Err(CoreError::UnsupportedVersion {
                found: version,
                supported: format!("{MIN_PLAN_STATE_VERSION}..={PLAN_STATE_VERSION}"),
            });
        }

        let mut state: Self = serde_json::from_value(value)?;
        state.validate()?;
        state.version = PLAN_STATE_VERSION;
        Ok(state)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the semester list length differs
    /// from `semester_count` or `current_semester` points past the end.
    pub fn validate(&self) -> Result<(), CoreError> {
        let count = usize::try_from(self.semester_count)
            .map_err(|_| CoreError::Validation("semester count out of range".into()))?;
        if self.semesters.len() != count {
            return Err(CoreError::Validation(format!(
                "plan lists {} semesters but semesterCount is {count}",
                self.semesters.len()
            )));
        }
        if count > 0 && self.current_semester >= self.semester_count {
            return Err(CoreError::Validation(format!(
                "currentSemester {} is out of range",
                self.current_semester
            )));
        }
        Ok(())
    }

    /// Every course code placed in some semester, in plan order.
    pub fn planned_course_codes(&self) -> impl Iterator<Item = &str> {
        self.semesters
            .iter()
            .flat_map(|semester| semester.course_codes.iter().map(String::as_str))
    }
}
