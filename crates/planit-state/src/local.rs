//! Provider backed by the local store and the sync engine.

use std::sync::Arc;

use async_trait::async_trait;
use planit_core::entities::{Catalogs, Course, PlanState, RequirementRecord, RequirementsSelection};
use planit_core::enums::{SortDirection, SortKey};
use planit_core::meta::{COURSE_SYNC_KEYS, PLAN_STATE};
use planit_db::PlanitDb;
use planit_search::{CourseQuery, CourseQueryResult, query_courses};
use planit_sync::{
    RequirementsSync, RequirementsSyncOptions, RequirementsSyncResult, SyncContext,
};

use crate::error::StateError;
use crate::{CatalogProvider, CourseProvider, DegreeProvider, PlanProvider, RequirementProvider};

pub struct LocalStateProvider {
    store: Arc<PlanitDb>,
    requirements: RequirementsSync,
}

impl LocalStateProvider {
    #[must_use]
    pub fn new(ctx: SyncContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            requirements: RequirementsSync::new(ctx),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<PlanitDb> {
        &self.store
    }
}

#[async_trait]
impl CourseProvider for LocalStateProvider {
    async fn course(&self, code: &str) -> Result<Option<Course>, StateError> {
        Ok(self.store.get_course(code).await?)
    }

    async fn set_courses(&self, courses: &[Course]) -> Result<(), StateError> {
        Ok(self.store.put_courses(courses).await?)
    }

    async fn query_courses(&self, query: &CourseQuery) -> Result<CourseQueryResult, StateError> {
        Ok(query_courses(&self.store, query).await?)
    }

    async fn courses_page(&self, limit: usize, offset: usize) -> Result<Vec<Course>, StateError> {
        Ok(self.store.courses_page(limit, offset).await?)
    }

    async fn courses_sorted(
        &self,
        limit: usize,
        offset: usize,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<Course>, StateError> {
        Ok(self.store.courses_sorted(limit, offset, key, direction).await?)
    }

    async fn course_count(&self) -> Result<usize, StateError> {
        Ok(self.store.course_count().await?)
    }

    async fn course_faculties(&self) -> Result<Vec<String>, StateError> {
        Ok(self.store.course_faculties().await?)
    }

    async fn courses_last_sync(&self) -> Result<Option<String>, StateError> {
        Ok(self.store.get_meta_string(COURSE_SYNC_KEYS.last_sync).await?)
    }
}

#[async_trait]
impl CatalogProvider for LocalStateProvider {
    async fn catalogs(&self) -> Result<Catalogs, StateError> {
        Ok(self.store.get_catalogs().await?)
    }

    async fn set_catalogs(&self, catalogs: &Catalogs) -> Result<(), StateError> {
        Ok(self.store.put_catalogs(catalogs).await?)
    }
}

#[async_trait]
impl RequirementProvider for LocalStateProvider {
    async fn requirement(&self, program_id: &str) -> Result<Option<RequirementRecord>, StateError> {
        Ok(self.store.get_requirement(program_id).await?)
    }

    async fn set_requirement(
        &self,
        record: &RequirementRecord,
        previous_program_id: Option<&str>,
        persist_active_selection: bool,
    ) -> Result<(), StateError> {
        if persist_active_selection {
            self.store.replace_requirement(record, previous_program_id).await?;
        } else {
            self.store.preview_requirement(record).await?;
        }
        Ok(())
    }

    async fn sync_requirements(
        &self,
        selection: &RequirementsSelection,
        options: RequirementsSyncOptions,
    ) -> Result<RequirementsSyncResult, StateError> {
        let result = self.requirements.sync(selection, options).await;
        if let Err(error) = &result {
            tracing::warn!(program = %selection.program_id, %error, "requirements sync failed");
        }
        Ok(RequirementsSyncResult::fold(result)?)
    }
}

#[async_trait]
impl DegreeProvider for LocalStateProvider {
    async fn user_degree(&self) -> Result<Option<RequirementsSelection>, StateError> {
        Ok(self.store.active_selection().await?)
    }

    async fn set_user_degree(&self, selection: &RequirementsSelection) -> Result<(), StateError> {
        Ok(self.store.set_active_selection(selection).await?)
    }
}

#[async_trait]
impl PlanProvider for LocalStateProvider {
    async fn user_plan(&self) -> Result<Option<PlanState>, StateError> {
        let Some(value) = self.store.get_meta(PLAN_STATE).await? else {
            return Ok(None);
        };
        match PlanState::from_value(value) {
            Ok(plan) => Ok(Some(plan)),
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable plan state");
                Ok(None)
            }
        }
    }

    async fn set_user_plan(&self, plan: &PlanState) -> Result<(), StateError> {
        plan.validate()?;
        let value = serde_json::to_value(plan).map_err(planit_core::errors::CoreError::from)?;
        Ok(self.store.set_meta(PLAN_STATE, &value).await?)
    }
}
