//! # planit-search
//!
//! Course queries over the local store.
//!
//! A query applies the structured filters (availability, faculty, numeric
//! ranges, requirement membership) first, then the free-text match, then
//! ranks matches into three tiers:
//! 1. course code starts with the whole normalized query
//! 2. course name starts with the whole normalized query
//! 3. every query token appears somewhere in "code name"
//!
//! Encounter order is kept within a tier. The same ranking runs over the
//! store's cursor ([`query_courses`]) and over in-memory slices
//! ([`query_in_memory`]), so both state providers agree on results.

pub mod error;
pub mod guard;
pub mod query;
pub mod ranking;

pub use error::SearchError;
pub use guard::{RequestGuard, RequestTicket};
pub use query::{CourseQuery, PageSize, normalize_search_text};
pub use ranking::{CourseQueryResult, CourseRanker, MatchTier};

use planit_core::entities::Course;
use planit_db::PlanitDb;

/// Run `query` over every stored course.
///
/// # Errors
///
/// Returns [`SearchError::Store`] if the course scan fails.
pub async fn query_courses(
    store: &PlanitDb,
    query: &CourseQuery,
) -> Result<CourseQueryResult, SearchError> {
    let mut ranker = CourseRanker::new(query);
    store.scan_courses(|course| ranker.push(course)).await?;
    let result = ranker.finish();
    tracing::debug!(total = result.total, returned = result.courses.len(), "course query");
    Ok(result)
}

/// Run `query` over courses already in memory, in iteration order.
#[must_use]
pub fn query_in_memory<'a, I>(courses: I, query: &CourseQuery) -> CourseQueryResult
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut ranker = CourseRanker::new(query);
    for course in courses {
        ranker.offer(course);
    }
    ranker.finish()
}
