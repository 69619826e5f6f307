//! Course queries against a real in-memory store.

use planit_core::entities::Course;
use planit_db::PlanitDb;
use planit_search::{CourseQuery, PageSize, query_courses, query_in_memory};
use pretty_assertions::assert_eq;

fn course(code: &str, name: &str, faculty: &str, points: f64) -> Course {
    Course {
        code: code.into(),
        name: Some(name.into()),
        faculty: Some(faculty.into()),
        points: Some(points),
        current: Some(true),
        ..Course::default()
    }
}

fn fixture() -> Vec<Course> {
    vec![
        course("104031", "Calculus 1M", "Mathematics", 5.5),
        course("104032", "Calculus 2M", "Mathematics", 5.0),
        course("234114", "Intro to Computer Science", "Computer Science", 4.0),
        course("234218", "Data Structures 1", "Computer Science", 3.0),
        course("999999", "234 Something", "Humanities", 2.0),
    ]
}

async fn seeded() -> PlanitDb {
    let db = PlanitDb::open_local(":memory:").await.unwrap();
    db.put_courses(&fixture()).await.unwrap();
    db
}

fn codes(courses: &[Course]) -> Vec<&str> {
    courses.iter().map(|c| c.code.as_str()).collect()
}

#[tokio::test]
async fn code_prefix_ranks_first() {
    let db = seeded().await;
    let result = query_courses(&db, &CourseQuery::text("234")).await.unwrap();
    assert_eq!(codes(&result.courses), vec!["234114", "234218", "999999"]);
    assert_eq!(result.total, 3);
}

#[tokio::test]
async fn filters_combine_with_text() {
    let db = seeded().await;
    let query = CourseQuery {
        query: Some("calc".into()),
        faculty: Some("Mathematics".into()),
        points_min: Some(5.2),
        ..CourseQuery::default()
    };
    let result = query_courses(&db, &query).await.unwrap();
    assert_eq!(codes(&result.courses), vec!["104031"]);
}

#[tokio::test]
async fn requirement_codes_restrict_results() {
    let db = seeded().await;
    let query = CourseQuery {
        requirement_course_codes: vec!["234218".into(), "104032".into(), "000000".into()],
        ..CourseQuery::default()
    };
    let result = query_courses(&db, &query).await.unwrap();
    assert_eq!(codes(&result.courses), vec!["104032", "234218"]);
    assert_eq!(result.total, 2);
}

#[tokio::test]
async fn pages_report_full_total() {
    let db = seeded().await;
    let query = CourseQuery {
        page: Some(2),
        page_size: PageSize::Limit(2),
        ..CourseQuery::default()
    };
    let result = query_courses(&db, &query).await.unwrap();
    assert_eq!(codes(&result.courses), vec!["234114", "234218"]);
    assert_eq!(result.total, 5);
}

#[tokio::test]
async fn empty_store_yields_nothing() {
    let db = PlanitDb::open_local(":memory:").await.unwrap();
    let result = query_courses(&db, &CourseQuery::text("calc")).await.unwrap();
    assert!(result.courses.is_empty());
    assert_eq!(result.total, 0);
}

#[tokio::test]
async fn store_and_memory_agree() {
    let db = seeded().await;
    // The store scans in code order; feed memory the same order.
    let mut sorted = fixture();
    sorted.sort_by(|a, b| a.code.cmp(&b.code));

    for text in ["", "234", "calculus", "data 1", "science intro", "zzz"] {
        let query = CourseQuery {
            query: Some(text.into()),
            page_size: PageSize::Limit(2),
            ..CourseQuery::default()
        };
        let stored = query_courses(&db, &query).await.unwrap();
        let memory = query_in_memory(&sorted, &query);
        assert_eq!(stored, memory, "query {text:?}");
    }
}
