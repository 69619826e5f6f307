//! Provider that keeps everything in memory.
//!
//! Used for tests and demos. Courses live in a map ordered by code, the
//! same order the store scans in, and queries go through the same ranking
//! and two-pass paging code as the store so both providers return the same
//! pages for the same data.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use planit_core::entities::{
    Catalogs, Course, PlanState, RequirementNode, RequirementRecord, RequirementsSelection,
};
use planit_core::enums::{SortDirection, SortKey};
use planit_core::paging::page_two_pass;
use planit_search::{CourseQuery, CourseQueryResult, query_in_memory};
use planit_sync::snapshot::parse_courses;
use planit_sync::{RequirementsSyncOptions, RequirementsSyncResult};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StateError;
use crate::{CatalogProvider, CourseProvider, DegreeProvider, PlanProvider, RequirementProvider};

/// Seed data for a [`MemoryStateProvider`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStatePayload {
    /// Object keyed by code, or an array of courses.
    pub courses: Value,
    pub catalogs: Catalogs,
    pub user_degree: RequirementsSelection,
    pub requirements: RequirementNode,
}

impl MemoryStatePayload {
    /// Parse a JSON seed. Anything malformed yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(raw) {
            Ok(payload) if payload.courses.is_object() || payload.courses.is_array() => {
                Some(payload)
            }
            Ok(_) => None,
            Err(error) => {
                tracing::debug!(%error, "invalid memory state payload");
                None
            }
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    courses: BTreeMap<String, Course>,
    catalogs: Catalogs,
    degree: Option<RequirementsSelection>,
    requirements: Vec<RequirementRecord>,
    /// Program whose tree was stored by a preview sync.
    preview: Option<String>,
    plan: Option<PlanState>,
    courses_last_sync: Option<String>,
}

impl MemoryState {
    /// Point the active selection at `selection`, re-keying the active tree.
    fn select(&mut self, selection: RequirementsSelection) {
        self.discard_preview(&[selection.program_id.as_str()]);
        let previous = self.degree.as_ref().map(|d| d.program_id.clone());
        let data = previous
            .as_deref()
            .and_then(|program| self.take_requirement(program))
            .map(|record| record.data);
        if let Some(data) = data {
            self.put_requirement(selection.clone().into_record(data));
        }
        self.degree = Some(selection);
    }

    fn take_requirement(&mut self, program_id: &str) -> Option<RequirementRecord> {
        let index = self
            .requirements
            .iter()
            .position(|r| r.program_id == program_id)?;
        Some(self.requirements.remove(index))
    }

    fn put_requirement(&mut self, record: RequirementRecord) {
        self.take_requirement(&record.program_id);
        self.requirements.push(record);
    }

    /// Store a previewed tree, dropping the previous preview unless it is
    /// the active program or `record`'s program.
    fn put_preview(&mut self, record: RequirementRecord) {
        let active = self
            .degree
            .as_ref()
            .map(|d| d.program_id.clone())
            .unwrap_or_default();
        self.discard_preview(&[record.program_id.as_str(), active.as_str()]);
        if record.program_id != active {
            self.preview = Some(record.program_id.clone());
        }
        self.put_requirement(record);
    }

    fn discard_preview(&mut self, keep: &[&str]) {
        if let Some(preview) = self
            .preview
            .take()
            .filter(|p| !p.is_empty() && !keep.contains(&p.as_str()))
        {
            self.take_requirement(&preview);
        }
    }
}

/// In-memory [`StateProvider`](crate::StateProvider).
#[derive(Debug, Default)]
pub struct MemoryStateProvider {
    state: RwLock<MemoryState>,
}

impl MemoryStateProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a payload. The requirement tree is stored under the
    /// payload's degree selection.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Invalid`] if the course list is malformed.
    pub fn from_payload(payload: MemoryStatePayload) -> Result<Self, StateError> {
        let courses = parse_courses(payload.courses)
            .map_err(planit_core::errors::CoreError::Validation)?
            .into_iter()
            .map(|course| (course.code.clone(), course))
            .collect();
        let record = payload.user_degree.clone().into_record(payload.requirements);
        Ok(Self {
            state: RwLock::new(MemoryState {
                courses,
                catalogs: payload.catalogs,
                degree: Some(payload.user_degree),
                requirements: vec![record],
                ..MemoryState::default()
            }),
        })
    }
}

fn compare_values(key: SortKey, a: &Course, b: &Course) -> Ordering {
    match key {
        SortKey::Code => Ordering::Equal,
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Points => cmp_f64(a.points, b.points),
        SortKey::Median => cmp_f64(a.median, b.median),
    }
}

fn cmp_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => Ordering::Equal,
    }
}

fn has_value(key: SortKey, course: &Course) -> bool {
    match key {
        SortKey::Code => true,
        SortKey::Name => course.name.is_some(),
        SortKey::Points => course.points.is_some_and(f64::is_finite),
        SortKey::Median => course.median.is_some_and(f64::is_finite),
    }
}

#[async_trait]
impl CourseProvider for MemoryStateProvider {
    async fn course(&self, code: &str) -> Result<Option<Course>, StateError> {
        Ok(self.state.read().await.courses.get(code).cloned())
    }

    async fn set_courses(&self, courses: &[Course]) -> Result<(), StateError> {
        if courses.iter().any(|course| course.code.is_empty()) {
            let error = planit_core::errors::CoreError::Validation("course without a code".into());
            return Err(error.into());
        }
        let mut state = self.state.write().await;
        for course in courses {
            state.courses.insert(course.code.clone(), course.clone());
        }
        Ok(())
    }

    async fn query_courses(&self, query: &CourseQuery) -> Result<CourseQueryResult, StateError> {
        Ok(query_in_memory(self.state.read().await.courses.values(), query))
    }

    async fn courses_page(&self, limit: usize, offset: usize) -> Result<Vec<Course>, StateError> {
        let state = self.state.read().await;
        Ok(state.courses.values().skip(offset).take(limit).cloned().collect())
    }

    async fn courses_sorted(
        &self,
        limit: usize,
        offset: usize,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<Course>, StateError> {
        let state = self.state.read().await;
        let (mut defined, missing): (Vec<&Course>, Vec<&Course>) =
            state.courses.values().partition(|course| has_value(key, course));
        defined.sort_by(|a, b| {
            let ordering = compare_values(key, a, b).then_with(|| a.code.cmp(&b.code));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        Ok(page_two_pass(&defined, &missing, limit, offset)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn course_count(&self) -> Result<usize, StateError> {
        Ok(self.state.read().await.courses.len())
    }

    async fn course_faculties(&self) -> Result<Vec<String>, StateError> {
        let state = self.state.read().await;
        let faculties: BTreeSet<&str> = state
            .courses
            .values()
            .filter_map(Course::faculty_name)
            .collect();
        Ok(faculties.into_iter().map(String::from).collect())
    }

    async fn courses_last_sync(&self) -> Result<Option<String>, StateError> {
        Ok(self.state.read().await.courses_last_sync.clone())
    }
}

#[async_trait]
impl CatalogProvider for MemoryStateProvider {
    async fn catalogs(&self) -> Result<Catalogs, StateError> {
        Ok(self.state.read().await.catalogs.clone())
    }

    async fn set_catalogs(&self, catalogs: &Catalogs) -> Result<(), StateError> {
        let mut state = self.state.write().await;
        state
            .catalogs
            .extend(catalogs.iter().map(|(id, data)| (id.clone(), data.clone())));
        Ok(())
    }
}

#[async_trait]
impl RequirementProvider for MemoryStateProvider {
    async fn requirement(&self, program_id: &str) -> Result<Option<RequirementRecord>, StateError> {
        let state = self.state.read().await;
        Ok(state
            .requirements
            .iter()
            .find(|r| r.program_id == program_id)
            .cloned())
    }

    async fn set_requirement(
        &self,
        record: &RequirementRecord,
        previous_program_id: Option<&str>,
        persist_active_selection: bool,
    ) -> Result<(), StateError> {
        let mut state = self.state.write().await;
        if persist_active_selection {
            if let Some(previous) = previous_program_id
                .filter(|previous| !previous.is_empty() && *previous != record.program_id)
            {
                state.take_requirement(previous);
            }
            state.discard_preview(&[record.program_id.as_str()]);
            state.degree = Some(RequirementsSelection::new(
                record.catalog_id.clone(),
                record.faculty_id.clone(),
                record.program_id.clone(),
                record.path.clone(),
            ));
            state.put_requirement(record.clone());
        } else {
            state.put_preview(record.clone());
        }
        Ok(())
    }

    /// Nothing to download: the loaded tree is re-keyed to `selection`.
    async fn sync_requirements(
        &self,
        selection: &RequirementsSelection,
        options: RequirementsSyncOptions,
    ) -> Result<RequirementsSyncResult, StateError> {
        let mut state = self.state.write().await;
        if options.persist_active_selection {
            state.select(selection.clone());
            return Ok(RequirementsSyncResult::Updated);
        }
        let data = state
            .degree
            .as_ref()
            .and_then(|d| state.requirements.iter().find(|r| r.program_id == d.program_id))
            .map(|r| r.data.clone());
        match data {
            Some(data) => {
                state.put_preview(selection.clone().into_record(data));
                Ok(RequirementsSyncResult::Updated)
            }
            None => Ok(RequirementsSyncResult::Failed {
                error: "no requirement tree loaded".into(),
            }),
        }
    }
}

#[async_trait]
impl DegreeProvider for MemoryStateProvider {
    async fn user_degree(&self) -> Result<Option<RequirementsSelection>, StateError> {
        Ok(self.state.read().await.degree.clone())
    }

    async fn set_user_degree(&self, selection: &RequirementsSelection) -> Result<(), StateError> {
        self.state.write().await.select(selection.clone());
        Ok(())
    }
}

#[async_trait]
impl PlanProvider for MemoryStateProvider {
    async fn user_plan(&self) -> Result<Option<PlanState>, StateError> {
        Ok(self.state.read().await.plan.clone())
    }

    async fn set_user_plan(&self, plan: &PlanState) -> Result<(), StateError> {
        plan.validate()?;
        self.state.write().await.plan = Some(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SEED: &str = r#"{
        "courses": {
            "104031": {"name": "Calculus 1M", "faculty": " Mathematics ", "points": 5.5},
            "234114": {"name": "Intro to CS", "faculty": "Computer Science", "current": true}
        },
        "catalogs": {"2024_200": {"cs": {"he": "מדעי המחשב"}}},
        "userDegree": {"catalogId": "2024_200", "facultyId": "cs", "programId": "p1"},
        "requirements": {"name": "root", "nested": [{"name": "core", "courses": ["234114"]}]}
    }"#;

    fn seeded() -> MemoryStateProvider {
        MemoryStateProvider::from_payload(MemoryStatePayload::parse(SEED).unwrap()).unwrap()
    }

    #[test]
    fn parse_rejects_missing_sections() {
        assert!(MemoryStatePayload::parse("{}").is_none());
        assert!(MemoryStatePayload::parse("not json").is_none());
        let scalar_courses = SEED.replacen(
            r#""courses": {"#,
            r#""courses": 5, "unused": {"#,
            1,
        );
        assert!(MemoryStatePayload::parse(&scalar_courses).is_none());
    }

    #[tokio::test]
    async fn seeded_provider_serves_payload() {
        let provider = seeded();
        let course = provider.course("104031").await.unwrap().unwrap();
        assert_eq!(course.code, "104031");
        assert_eq!(
            provider.course_faculties().await.unwrap(),
            vec!["Computer Science".to_string(), "Mathematics".to_string()]
        );
        assert_eq!(provider.catalogs().await.unwrap().len(), 1);
        assert!(provider.requirement("p1").await.unwrap().is_some());
        assert!(provider.requirement("p2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn selecting_a_degree_rekeys_the_tree() {
        let provider = seeded();
        let next = RequirementsSelection::new("2024_200", "cs", "p2", Some("track".into()));
        provider.set_user_degree(&next).await.unwrap();

        assert_eq!(provider.user_degree().await.unwrap(), Some(next));
        assert!(provider.requirement("p1").await.unwrap().is_none());
        let record = provider.requirement("p2").await.unwrap().unwrap();
        assert_eq!(record.path.as_deref(), Some("track"));
    }

    #[tokio::test]
    async fn preview_sync_keeps_degree() {
        let provider = seeded();
        let preview = RequirementsSelection::new("2024_200", "cs", "p9", None);
        let result = provider
            .sync_requirements(&preview, RequirementsSyncOptions::preview())
            .await
            .unwrap();
        assert_eq!(result, RequirementsSyncResult::Updated);
        let degree = provider.user_degree().await.unwrap().unwrap();
        assert_eq!(degree.program_id, "p1");
        assert!(provider.requirement("p9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn committing_a_degree_drops_the_preview() {
        let provider = seeded();
        let preview = RequirementsSelection::new("2024_200", "cs", "p9", None);
        provider
            .sync_requirements(&preview, RequirementsSyncOptions::preview())
            .await
            .unwrap();
        let next = RequirementsSelection::new("2024_200", "cs", "p2", None);
        provider
            .sync_requirements(&next, RequirementsSyncOptions::default())
            .await
            .unwrap();

        assert_eq!(provider.requirement("p9").await.unwrap(), None);
        assert_eq!(provider.requirement("p1").await.unwrap(), None);
        assert!(provider.requirement("p2").await.unwrap().is_some());
        assert_eq!(provider.user_degree().await.unwrap(), Some(next));
    }

    #[tokio::test]
    async fn a_second_preview_replaces_the_first() {
        let provider = seeded();
        for program in ["p8", "p9"] {
            let preview = RequirementsSelection::new("2024_200", "cs", program, None);
            provider
                .sync_requirements(&preview, RequirementsSyncOptions::preview())
                .await
                .unwrap();
        }

        assert_eq!(provider.requirement("p8").await.unwrap(), None);
        assert!(provider.requirement("p9").await.unwrap().is_some());
        assert!(provider.requirement("p1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_provider_has_nothing_to_preview() {
        let provider = MemoryStateProvider::new();
        let preview = RequirementsSelection::new("2024_200", "cs", "p9", None);
        let result = provider
            .sync_requirements(&preview, RequirementsSyncOptions::preview())
            .await
            .unwrap();
        assert!(matches!(result, RequirementsSyncResult::Failed { .. }));
    }

    #[tokio::test]
    async fn rejects_courses_without_code() {
        let provider = MemoryStateProvider::new();
        let err = provider.set_courses(&[Course::default()]).await.unwrap_err();
        assert!(matches!(err, StateError::Invalid(_)));
        assert_eq!(provider.course_count().await.unwrap(), 0);
    }
}
