use std::collections::HashSet;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::number::finite_number;

/// A single course in the catalog, keyed by its course code.
///
/// Absent optional fields mean "unknown", never zero. Records are replaced
/// wholesale by a sync batch and never patched field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Credit points.
    #[serde(default, deserialize_with = "finite_number", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub points: Option<f64>,
    /// Median grade from the grade histograms.
    #[serde(default, deserialize_with = "finite_number", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    /// Whether the course is offered in the current semester.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<String>,
    /// Exam dates in published order. Unscheduled exams are `null`.
    #[serde(default, rename = "tests", skip_serializing_if = "Vec::is_empty")]
    pub exam_dates: Vec<Option<ExamDate>>,
    #[serde(default, skip_serializing_if = "Connections::is_empty")]
    pub connections: Connections,
}

impl Course {
    /// True only when the course is flagged as currently offered.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.current == Some(true)
    }

    /// Whether `completed` satisfies this course's prerequisites.
    ///
    /// Dependencies are alternative groups: the course is open when any one
    /// group has every code completed. No groups means no prerequisites.
    #[must_use]
    pub fn prerequisites_satisfied(&self, completed: &HashSet<String>) -> bool {
        let groups = &self.connections.dependencies;
        groups.is_empty()
            || groups
                .iter()
                .any(|group| group.iter().all(|code| completed.contains(code)))
    }

    /// Faculty name with surrounding whitespace removed, if non-empty.
    #[must_use]
    pub fn faculty_name(&self) -> Option<&str> {
        self.faculty
            .as_deref()
            .map(str::trim)
            .filter(|faculty| !faculty.is_empty())
    }
}

/// Prerequisite and relationship links between courses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Connections {
    /// Alternative prerequisite groups.
    #[serde(default)]
    pub dependencies: Vec<Vec<String>>,
    #[serde(default)]
    pub adjacent: Vec<String>,
    /// Courses that cannot be credited together with this one.
    #[serde(default)]
    pub exclusive: Vec<String>,
}

impl Connections {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.adjacent.is_empty() && self.exclusive.is_empty()
    }
}

/// An exam date with a zero-based month, as published by the scraper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExamDate {
    pub year: i32,
    pub month_index: u32,
    pub day: u32,
}

impl ExamDate {
    /// Calendar date, or `None` when the fields do not form a valid date.
    #[must_use]
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month_index.checked_add(1)?, self.day)
    }
}
