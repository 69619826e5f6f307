//! Tiered ranking and pagination of matching courses.

use planit_core::entities::Course;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::query::{CompiledQuery, CourseQuery, normalize_search_text};

/// Why a course matched a text query, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    CodePrefix,
    NamePrefix,
    Substring,
}

impl MatchTier {
    const fn index(self) -> usize {
        match self {
            Self::CodePrefix => 0,
            Self::NamePrefix => 1,
            Self::Substring => 2,
        }
    }
}

/// One page of query results plus the total number of matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CourseQueryResult {
    pub courses: Vec<Course>,
    pub total: usize,
}

/// Accumulates courses in encounter order and produces a ranked page.
#[derive(Debug)]
pub struct CourseRanker {
    query: CompiledQuery,
    tiers: [Vec<Course>; 3],
}

impl CourseRanker {
    #[must_use]
    pub fn new(query: &CourseQuery) -> Self {
        Self {
            query: CompiledQuery::new(query),
            tiers: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Tier `course` would land in, or `None` if it does not match.
    ///
    /// Without a text query every course passing the filters lands in the
    /// first tier, which keeps store order.
    #[must_use]
    pub fn classify(&self, course: &Course) -> Option<MatchTier> {
        if !self.query.matches_filters(course) {
            return None;
        }
        if !self.query.has_text() {
            return Some(MatchTier::CodePrefix);
        }

        let name = course.name.as_deref().unwrap_or_default();
        let haystack = normalize_search_text(&format!("{} {name}", course.code));
        if !self.query.tokens.iter().all(|token| haystack.contains(token.as_str())) {
            return None;
        }

        let needle = self.query.normalized.as_str();
        if normalize_search_text(&course.code).starts_with(needle) {
            Some(MatchTier::CodePrefix)
        } else if normalize_search_text(name).starts_with(needle) {
            Some(MatchTier::NamePrefix)
        } else {
            Some(MatchTier::Substring)
        }
    }

    /// Take ownership of `course` if it matches.
    pub fn push(&mut self, course: Course) {
        if let Some(tier) = self.classify(&course) {
            self.tiers[tier.index()].push(course);
        }
    }

    /// Clone `course` in if it matches.
    pub fn offer(&mut self, course: &Course) {
        if let Some(tier) = self.classify(course) {
            self.tiers[tier.index()].push(course.clone());
        }
    }

    /// Concatenate the tiers and cut the requested page.
    #[must_use]
    pub fn finish(self) -> CourseQueryResult {
        let [code, name, substring] = self.tiers;
        let mut ranked = code;
        ranked.extend(name);
        ranked.extend(substring);
        let total = ranked.len();

        let courses = match self.query.limit {
            None => ranked,
            Some(limit) => ranked
                .into_iter()
                .skip(self.query.offset)
                .take(limit)
                .collect(),
        };
        CourseQueryResult { courses, total }
    }
}
