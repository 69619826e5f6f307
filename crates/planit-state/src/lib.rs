//! # planit-state
//!
//! The data access surface pages and commands talk to.
//!
//! [`StateProvider`] bundles five capability traits (courses, catalogs,
//! requirements, degree selection, semester plan). [`LocalStateProvider`]
//! serves them from the libSQL store and the sync engine;
//! [`MemoryStateProvider`] keeps everything in plain collections and runs
//! the same query, ranking, and paging code so results match.
//! [`StateHandle`] holds the active provider and lets callers swap it.

pub mod error;
pub mod handle;
pub mod local;
pub mod memory;

pub use error::StateError;
pub use handle::StateHandle;
pub use local::LocalStateProvider;
pub use memory::{MemoryStatePayload, MemoryStateProvider};

use async_trait::async_trait;
use planit_core::entities::{Catalogs, Course, PlanState, RequirementRecord, RequirementsSelection};
use planit_core::enums::{SortDirection, SortKey};
use planit_search::{CourseQuery, CourseQueryResult};
use planit_sync::{RequirementsSyncOptions, RequirementsSyncResult};

#[async_trait]
pub trait CourseProvider: Send + Sync {
    async fn course(&self, code: &str) -> Result<Option<Course>, StateError>;

    /// Upsert every course in one batch.
    async fn set_courses(&self, courses: &[Course]) -> Result<(), StateError>;

    async fn query_courses(&self, query: &CourseQuery) -> Result<CourseQueryResult, StateError>;

    /// Courses in code order. A zero `limit` yields an empty page.
    async fn courses_page(&self, limit: usize, offset: usize) -> Result<Vec<Course>, StateError>;

    /// Courses ordered by `key`, courses without a value last.
    async fn courses_sorted(
        &self,
        limit: usize,
        offset: usize,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<Course>, StateError>;

    async fn course_count(&self) -> Result<usize, StateError>;

    /// Distinct trimmed faculty names, sorted.
    async fn course_faculties(&self) -> Result<Vec<String>, StateError>;

    /// When course data was last synced, if ever.
    async fn courses_last_sync(&self) -> Result<Option<String>, StateError>;
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn catalogs(&self) -> Result<Catalogs, StateError>;
    async fn set_catalogs(&self, catalogs: &Catalogs) -> Result<(), StateError>;
}

#[async_trait]
pub trait RequirementProvider: Send + Sync {
    async fn requirement(&self, program_id: &str) -> Result<Option<RequirementRecord>, StateError>;

    /// Store `record`. With `persist_active_selection` it replaces the tree
    /// of `previous_program_id` and becomes the active selection; without it
    /// the tree is stored alongside and the selection is left alone.
    async fn set_requirement(
        &self,
        record: &RequirementRecord,
        previous_program_id: Option<&str>,
        persist_active_selection: bool,
    ) -> Result<(), StateError>;

    /// Fetch and store the tree for `selection`. Remote failures are
    /// reported as [`RequirementsSyncResult::Failed`].
    async fn sync_requirements(
        &self,
        selection: &RequirementsSelection,
        options: RequirementsSyncOptions,
    ) -> Result<RequirementsSyncResult, StateError>;
}

#[async_trait]
pub trait DegreeProvider: Send + Sync {
    async fn user_degree(&self) -> Result<Option<RequirementsSelection>, StateError>;
    async fn set_user_degree(&self, selection: &RequirementsSelection) -> Result<(), StateError>;
}

#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// The saved plan. A stored payload of unknown shape or version reads as
    /// `None`.
    async fn user_plan(&self) -> Result<Option<PlanState>, StateError>;
    async fn set_user_plan(&self, plan: &PlanState) -> Result<(), StateError>;
}

/// Every capability a page needs.
pub trait StateProvider:
    CourseProvider + CatalogProvider + RequirementProvider + DegreeProvider + PlanProvider
{
}

impl<T> StateProvider for T where
    T: CourseProvider + CatalogProvider + RequirementProvider + DegreeProvider + PlanProvider
{
}
