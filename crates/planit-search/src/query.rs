//! Query parameters and their normalized form.

use std::collections::HashSet;

use planit_core::entities::Course;

/// Trim, lowercase, and collapse runs of whitespace to one space.
#[must_use]
pub fn normalize_search_text(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// How many results a page holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    /// Every match, no pagination.
    #[default]
    All,
    /// At most this many matches per page. Zero behaves like [`PageSize::All`].
    Limit(usize),
}

/// Parameters of a course query. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseQuery {
    /// Free text matched against "code name".
    pub query: Option<String>,
    /// Keep only courses offered in the current semester.
    pub available_only: bool,
    /// Exact faculty name. Blank means no filter.
    pub faculty: Option<String>,
    pub points_min: Option<f64>,
    pub points_max: Option<f64>,
    pub median_min: Option<f64>,
    pub median_max: Option<f64>,
    /// Keep only these course codes. Empty means no filter.
    pub requirement_course_codes: Vec<String>,
    /// 1-based page number. Missing or zero means the first page.
    pub page: Option<usize>,
    pub page_size: PageSize,
}

impl CourseQuery {
    #[must_use]
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Range {
    min: Option<f64>,
    max: Option<f64>,
}

impl Range {
    fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.filter(|v| v.is_finite()),
            max: max.filter(|v| v.is_finite()),
        }
    }

    const fn is_active(self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    fn admits(self, value: Option<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return false;
        };
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A [`CourseQuery`] with every input normalized once.
#[derive(Debug, Clone)]
pub(crate) struct CompiledQuery {
    pub(crate) normalized: String,
    pub(crate) tokens: Vec<String>,
    faculty: Option<String>,
    available_only: bool,
    points: Range,
    median: Range,
    requirement_codes: HashSet<String>,
    pub(crate) offset: usize,
    pub(crate) limit: Option<usize>,
}

impl CompiledQuery {
    pub(crate) fn new(query: &CourseQuery) -> Self {
        let normalized = normalize_search_text(query.query.as_deref().unwrap_or_default());
        let tokens = normalized.split(' ').filter(|t| !t.is_empty()).map(String::from).collect();
        let limit = match query.page_size {
            PageSize::Limit(size) if size > 0 => Some(size),
            _ => None,
        };
        let page = query.page.filter(|p| *p >= 1).unwrap_or(1);
        let offset = limit.map_or(0, |size| (page - 1).saturating_mul(size));

        Self {
            normalized,
            tokens,
            faculty: query
                .faculty
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from),
            available_only: query.available_only,
            points: Range::new(query.points_min, query.points_max),
            median: Range::new(query.median_min, query.median_max),
            requirement_codes: query.requirement_course_codes.iter().cloned().collect(),
            offset,
            limit,
        }
    }

    pub(crate) fn has_text(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Every non-text filter admits `course`.
    pub(crate) fn matches_filters(&self, course: &Course) -> bool {
        if self.available_only && !course.is_available() {
            return false;
        }
        if let Some(faculty) = &self.faculty {
            if course.faculty.as_deref() != Some(faculty.as_str()) {
                return false;
            }
        }
        if !self.points.admits(course.points) || !self.median.admits(course.median) {
            return false;
        }
        self.requirement_codes.is_empty() || self.requirement_codes.contains(&course.code)
    }
}
