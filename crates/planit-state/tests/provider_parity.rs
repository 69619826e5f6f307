//! The in-memory provider must answer exactly like the store-backed one.

use std::sync::Arc;

use async_trait::async_trait;
use planit_config::RemoteConfig;
use planit_core::entities::{Course, RequirementNode, RequirementRecord, RequirementsSelection};
use planit_core::enums::{SortDirection, SortKey};
use planit_db::PlanitDb;
use planit_search::{CourseQuery, PageSize};
use planit_state::{CourseProvider, LocalStateProvider, MemoryStateProvider, StateProvider};
use planit_sync::{Connectivity, FetchRequest, FetchResponse, Fetcher, SyncContext, SyncError};
use pretty_assertions::assert_eq;
use rstest::rstest;

struct Offline;

#[async_trait]
impl Fetcher for Offline {
    async fn fetch(&self, _request: FetchRequest) -> Result<FetchResponse, SyncError> {
        Ok(FetchResponse::status(503))
    }
}

fn course(code: &str, name: Option<&str>, points: Option<f64>, median: Option<f64>) -> Course {
    Course {
        code: code.into(),
        name: name.map(Into::into),
        points,
        median,
        faculty: Some(
            if code.starts_with("234") {
                "Computer Science"
            } else {
                "Mathematics"
            }
            .into(),
        ),
        current: Some(code.ends_with('4')),
        ..Course::default()
    }
}

fn courses() -> Vec<Course> {
    vec![
        course("234114", Some("Intro to CS"), Some(4.0), Some(78.0)),
        course("104031", Some("Calculus 1M"), Some(5.5), None),
        course("999999", Some("234 Something"), None, Some(90.0)),
        course("234218", Some("Data Structures"), Some(3.0), Some(71.5)),
        course("104032", None, Some(5.5), None),
        course("236343", Some("Theory of Computation"), None, None),
    ]
}

fn program(program_id: &str) -> RequirementRecord {
    let tree = RequirementNode {
        name: Some("root".into()),
        courses: Some(vec!["234114".into()]),
        ..RequirementNode::default()
    };
    RequirementsSelection::new("2024_200", "cs", program_id, None).into_record(tree)
}

async fn providers() -> (LocalStateProvider, MemoryStateProvider) {
    let store = Arc::new(PlanitDb::open_local(":memory:").await.unwrap());
    let local = LocalStateProvider::new(SyncContext::new(
        store,
        Arc::new(Offline),
        RemoteConfig::default(),
        Connectivity::online(),
    ));
    let memory = MemoryStateProvider::new();
    local.set_courses(&courses()).await.unwrap();
    memory.set_courses(&courses()).await.unwrap();
    (local, memory)
}

fn codes(courses: &[Course]) -> Vec<String> {
    courses.iter().map(|c| c.code.clone()).collect()
}

#[rstest]
#[case(SortKey::Code, SortDirection::Asc)]
#[case(SortKey::Name, SortDirection::Asc)]
#[case(SortKey::Name, SortDirection::Desc)]
#[case(SortKey::Points, SortDirection::Asc)]
#[case(SortKey::Points, SortDirection::Desc)]
#[case(SortKey::Median, SortDirection::Desc)]
#[tokio::test]
async fn sorted_pages_match(#[case] key: SortKey, #[case] direction: SortDirection) {
    let (local, memory) = providers().await;
    for offset in 0..7 {
        let stored = local.courses_sorted(3, offset, key, direction).await.unwrap();
        let held = memory.courses_sorted(3, offset, key, direction).await.unwrap();
        assert_eq!(codes(&stored), codes(&held), "{key:?} {direction:?} offset {offset}");
    }
}

#[tokio::test]
async fn points_sort_puts_missing_last_both_ways() {
    let (local, _) = providers().await;
    let asc = local.courses_sorted(10, 0, SortKey::Points, SortDirection::Asc).await.unwrap();
    assert_eq!(
        codes(&asc),
        vec!["234218", "234114", "104031", "104032", "236343", "999999"]
    );
    let desc = local.courses_sorted(10, 0, SortKey::Points, SortDirection::Desc).await.unwrap();
    assert_eq!(
        codes(&desc),
        vec!["104032", "104031", "234114", "234218", "236343", "999999"]
    );
}

#[rstest]
#[case("")]
#[case("234")]
#[case("calc")]
#[case("intro cs")]
#[case("theory")]
#[tokio::test]
async fn queries_match(#[case] text: &str) {
    let (local, memory) = providers().await;
    let variants = [
        CourseQuery::text(text),
        CourseQuery {
            query: Some(text.into()),
            available_only: true,
            ..CourseQuery::default()
        },
        CourseQuery {
            query: Some(text.into()),
            points_min: Some(4.0),
            page: Some(1),
            page_size: PageSize::Limit(2),
            ..CourseQuery::default()
        },
        CourseQuery {
            query: Some(text.into()),
            faculty: Some("Computer Science".into()),
            median_max: Some(80.0),
            ..CourseQuery::default()
        },
    ];
    for query in &variants {
        let stored = local.query_courses(query).await.unwrap();
        let held = memory.query_courses(query).await.unwrap();
        assert_eq!(stored, held, "{query:?}");
    }
}

#[tokio::test]
async fn listings_match() {
    let (local, memory) = providers().await;
    assert_eq!(local.course_count().await.unwrap(), memory.course_count().await.unwrap());
    assert_eq!(
        local.course_faculties().await.unwrap(),
        memory.course_faculties().await.unwrap()
    );
    assert_eq!(
        codes(&local.courses_page(2, 1).await.unwrap()),
        codes(&memory.courses_page(2, 1).await.unwrap())
    );
    assert!(local.courses_page(0, 0).await.unwrap().is_empty());
    assert!(memory.courses_page(0, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn copy_on_write_switch_matches() {
    let (local, memory) = providers().await;
    let both: [&dyn StateProvider; 2] = [&local, &memory];
    for provider in both {
        let p1 = program("p1");
        let p2 = program("p2");

        provider.set_requirement(&p1, None, true).await.unwrap();
        provider.set_requirement(&p2, Some("p1"), true).await.unwrap();

        assert!(provider.requirement("p1").await.unwrap().is_none());
        assert!(provider.requirement("p2").await.unwrap().is_some());
        assert_eq!(
            provider.user_degree().await.unwrap().map(|d| d.program_id),
            Some("p2".to_string())
        );
    }
}

#[tokio::test]
async fn committed_switch_drops_preview_in_both() {
    let (local, memory) = providers().await;
    let both: [&dyn StateProvider; 2] = [&local, &memory];
    for provider in both {
        provider.set_requirement(&program("p1"), None, true).await.unwrap();
        provider.set_requirement(&program("p3"), None, false).await.unwrap();
        assert!(provider.requirement("p3").await.unwrap().is_some());

        provider
            .set_requirement(&program("p2"), Some("p1"), true)
            .await
            .unwrap();

        assert_eq!(provider.requirement("p3").await.unwrap(), None);
        assert_eq!(provider.requirement("p1").await.unwrap(), None);
        assert!(provider.requirement("p2").await.unwrap().is_some());
    }
}
