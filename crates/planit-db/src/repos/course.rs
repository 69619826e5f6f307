//! Course collection: point reads, store-order and sorted paging, batch
//! upserts, and cursor scans.

use std::collections::BTreeSet;

use planit_core::entities::Course;
use planit_core::enums::{SortDirection, SortKey};
use planit_core::paging::{Window, plan_two_pass};

use crate::PlanitDb;
use crate::error::StoreError;
use crate::helpers::{SortFields, decode_json, finish, from_sql_int, sort_column, sql_int};

const TABLE: &str = "courses";

/// Records visited between cooperative yields during a full scan.
const SCAN_YIELD_EVERY: usize = 256;

async fn upsert_course(conn: &libsql::Connection, course: &Course) -> Result<(), StoreError> {
    let data = serde_json::to_string(course)?;
    let fields = SortFields::of(course);
    conn.execute(
        "INSERT INTO courses (code, data, sort_name, sort_points, sort_median)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(code) DO UPDATE SET
             data = excluded.data,
             sort_name = excluded.sort_name,
             sort_points = excluded.sort_points,
             sort_median = excluded.sort_median",
        libsql::params![
            course.code.as_str(),
            data,
            fields.name,
            fields.points,
            fields.median
        ],
    )
    .await?;
    Ok(())
}

async fn collect_courses(mut rows: libsql::Rows) -> Result<Vec<Course>, StoreError> {
    let mut courses = Vec::new();
    while let Some(row) = rows.next().await? {
        courses.push(decode_json(TABLE, &row.get::<String>(0)?)?);
    }
    Ok(courses)
}

async fn read_window(
    conn: &libsql::Connection,
    sql: &str,
    window: Window,
) -> Result<Vec<Course>, StoreError> {
    let rows = conn
        .query(
            sql,
            libsql::params![sql_int(window.limit, "limit")?, sql_int(window.offset, "offset")?],
        )
        .await?;
    collect_courses(rows).await
}

impl PlanitDb {
    /// Fetch one course by code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails or the stored row is corrupt.
    pub async fn get_course(&self, code: &str) -> Result<Option<Course>, StoreError> {
        let conn = self.conn().await;
        let mut rows = conn
            .query("SELECT data FROM courses WHERE code = ?1", [code])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(decode_json(TABLE, &row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }

    /// Upsert a single course.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails (including an empty code).
    pub async fn put_course(&self, course: &Course) -> Result<(), StoreError> {
        let conn = self.conn().await;
        upsert_course(&conn, course).await
    }

    /// Upsert a batch of courses in one transaction.
    ///
    /// Either every record is written or none is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write fails; the transaction is rolled back.
    pub async fn put_courses(&self, courses: &[Course]) -> Result<(), StoreError> {
        let conn = self.conn().await;
        let tx = conn.transaction().await?;
        let result = async {
            for course in courses {
                upsert_course(&tx, course).await?;
            }
            Ok::<(), StoreError>(())
        }
        .await;
        finish(tx, result).await?;
        tracing::debug!(count = courses.len(), "stored course batch");
        Ok(())
    }

    /// Page through courses in persisted (code) order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub async fn courses_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Course>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let conn = self.conn().await;
        read_window(
            &conn,
            "SELECT data FROM courses ORDER BY code LIMIT ?1 OFFSET ?2",
            Window { offset, limit },
        )
        .await
    }

    /// Page through courses sorted by `key`.
    ///
    /// Courses without a value for `key` come after every course that has
    /// one, in persisted order, whichever the direction. Ties on the sort
    /// value are broken by code in the same direction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a query fails.
    pub async fn courses_sorted(
        &self,
        limit: usize,
        offset: usize,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<Course>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let column = sort_column(key);
        let dir = direction.as_sql();
        let conn = self.conn().await;

        let mut rows = conn
            .query(
                &format!("SELECT COUNT(*) FROM courses WHERE {column} IS NOT NULL"),
                (),
            )
            .await?;
        let defined_count = match rows.next().await? {
            Some(row) => from_sql_int(row.get::<i64>(0)?)?,
            None => 0,
        };

        let plan = plan_two_pass(limit, offset, defined_count);
        let mut page = Vec::with_capacity(limit.min(defined_count));
        if let Some(window) = plan.defined {
            let sql = format!(
                "SELECT data FROM courses WHERE {column} IS NOT NULL
                 ORDER BY {column} {dir}, code {dir} LIMIT ?1 OFFSET ?2"
            );
            page.extend(read_window(&conn, &sql, window).await?);
        }
        if let Some(window) = plan.missing {
            let sql = format!(
                "SELECT data FROM courses WHERE {column} IS NULL
                 ORDER BY code LIMIT ?1 OFFSET ?2"
            );
            page.extend(read_window(&conn, &sql, window).await?);
        }
        Ok(page)
    }

    /// Number of stored courses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub async fn course_count(&self) -> Result<usize, StoreError> {
        let conn = self.conn().await;
        let mut rows = conn.query("SELECT COUNT(*) FROM courses", ()).await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        from_sql_int(row.get::<i64>(0)?)
    }

    /// Visit every course in persisted order without materializing the
    /// whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan fails or a row is corrupt.
    pub async fn scan_courses<F>(&self, mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(Course),
    {
        let conn = self.conn().await;
        let mut rows = conn
            .query("SELECT data FROM courses ORDER BY code", ())
            .await?;
        let mut seen = 0usize;
        while let Some(row) = rows.next().await? {
            visit(decode_json(TABLE, &row.get::<String>(0)?)?);
            seen += 1;
            if seen % SCAN_YIELD_EVERY == 0 {
                tokio::task::yield_now().await;
            }
        }
        Ok(())
    }

    /// Distinct, trimmed, non-empty faculty names, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan fails.
    pub async fn course_faculties(&self) -> Result<Vec<String>, StoreError> {
        let mut faculties = BTreeSet::new();
        self.scan_courses(|course| {
            if let Some(name) = course.faculty_name() {
                faculties.insert(name.to_string());
            }
        })
        .await?;
        Ok(faculties.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{course, test_db};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn codes(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.code.as_str()).collect()
    }

    #[tokio::test]
    async fn put_then_get_returns_same_record() {
        let db = test_db().await;
        let calc = course("104031", Some("Calc 1"), Some(5.5));
        db.put_course(&calc).await.unwrap();

        assert_eq!(db.get_course("104031").await.unwrap(), Some(calc));
        assert_eq!(db.get_course("999999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn batch_upsert_overwrites_wholesale() {
        let db = test_db().await;
        db.put_courses(&[course("1", Some("Old"), Some(3.0))]).await.unwrap();
        db.put_courses(&[course("1", Some("New"), None), course("2", None, None)])
            .await
            .unwrap();

        let stored = db.get_course("1").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("New"));
        assert_eq!(stored.points, None);
        assert_eq!(db.course_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_batch_leaves_previous_data() {
        let db = test_db().await;
        db.put_courses(&[course("A", Some("Original"), Some(1.0))]).await.unwrap();

        let err = db
            .put_courses(&[
                course("A", Some("Replacement"), Some(2.0)),
                course("B", Some("Fresh"), None),
                course("", Some("No code"), None),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LibSql(_)));

        let a = db.get_course("A").await.unwrap().unwrap();
        assert_eq!(a.name.as_deref(), Some("Original"));
        assert_eq!(db.get_course("B").await.unwrap(), None);
        assert_eq!(db.course_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn page_uses_code_order() {
        let db = test_db().await;
        db.put_courses(&[
            course("300", None, None),
            course("100", None, None),
            course("200", None, None),
        ])
        .await
        .unwrap();

        assert_eq!(codes(&db.courses_page(2, 0).await.unwrap()), vec!["100", "200"]);
        assert_eq!(codes(&db.courses_page(2, 2).await.unwrap()), vec!["300"]);
        assert!(db.courses_page(0, 0).await.unwrap().is_empty());
        assert!(db.courses_page(5, 10).await.unwrap().is_empty());
    }

    #[rstest]
    #[case(SortDirection::Asc, vec!["C", "A", "B"])]
    #[case(SortDirection::Desc, vec!["A", "C", "B"])]
    #[tokio::test]
    async fn missing_points_sort_last(
        #[case] direction: SortDirection,
        #[case] expected: Vec<&str>,
    ) {
        let db = test_db().await;
        db.put_courses(&[
            course("A", None, Some(5.0)),
            course("B", None, None),
            course("C", None, Some(2.0)),
        ])
        .await
        .unwrap();

        let page = db
            .courses_sorted(10, 0, SortKey::Points, direction)
            .await
            .unwrap();
        assert_eq!(codes(&page), expected);
    }

    #[tokio::test]
    async fn sorted_offset_spans_both_passes() {
        let db = test_db().await;
        db.put_courses(&[
            course("A", Some("delta"), None),
            course("B", None, None),
            course("C", Some("alpha"), None),
            course("D", None, None),
            course("E", Some("charlie"), None),
        ])
        .await
        .unwrap();

        let first = db
            .courses_sorted(2, 0, SortKey::Name, SortDirection::Asc)
            .await
            .unwrap();
        let second = db
            .courses_sorted(2, 2, SortKey::Name, SortDirection::Asc)
            .await
            .unwrap();
        let third = db
            .courses_sorted(2, 4, SortKey::Name, SortDirection::Asc)
            .await
            .unwrap();

        assert_eq!(codes(&first), vec!["C", "E"]);
        assert_eq!(codes(&second), vec!["A", "B"]);
        assert_eq!(codes(&third), vec!["D"]);
    }

    #[tokio::test]
    async fn sort_by_code_descending() {
        let db = test_db().await;
        db.put_courses(&[course("1", None, None), course("3", None, None), course("2", None, None)])
            .await
            .unwrap();
        let page = db
            .courses_sorted(3, 0, SortKey::Code, SortDirection::Desc)
            .await
            .unwrap();
        assert_eq!(codes(&page), vec!["3", "2", "1"]);
    }

    #[tokio::test]
    async fn equal_values_break_ties_by_code() {
        let db = test_db().await;
        db.put_courses(&[
            course("B", None, Some(3.0)),
            course("A", None, Some(3.0)),
            course("C", None, Some(1.0)),
        ])
        .await
        .unwrap();

        let asc = db
            .courses_sorted(3, 0, SortKey::Points, SortDirection::Asc)
            .await
            .unwrap();
        let desc = db
            .courses_sorted(3, 0, SortKey::Points, SortDirection::Desc)
            .await
            .unwrap();
        assert_eq!(codes(&asc), vec!["C", "A", "B"]);
        assert_eq!(codes(&desc), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn faculties_are_trimmed_distinct_sorted() {
        let db = test_db().await;
        let mut physics = course("1", None, None);
        physics.faculty = Some(" Physics ".into());
        let mut math = course("2", None, None);
        math.faculty = Some("Mathematics".into());
        let mut physics_again = course("3", None, None);
        physics_again.faculty = Some("Physics".into());
        let mut blank = course("4", None, None);
        blank.faculty = Some("  ".into());
        db.put_courses(&[physics, math, physics_again, blank, course("5", None, None)])
            .await
            .unwrap();

        assert_eq!(
            db.course_faculties().await.unwrap(),
            vec!["Mathematics".to_string(), "Physics".to_string()]
        );
    }

    #[tokio::test]
    async fn scan_visits_in_code_order() {
        let db = test_db().await;
        db.put_courses(&[course("b", None, None), course("a", None, None)])
            .await
            .unwrap();
        let mut seen = Vec::new();
        db.scan_courses(|c| seen.push(c.code)).await.unwrap();
        assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
    }
}
