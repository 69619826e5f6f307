//! Requirement collection and the active program selection.
//!
//! Switching programs is a copy-on-write replace: the new tree is written,
//! the previous program's tree is deleted, and the active selection meta keys
//! are updated, all in one transaction.
//!
//! A preview sync stores one more tree next to the active one. Its program
//! id is kept in meta, and the next preview or switch deletes it, so the
//! collection never holds more than the active tree and one preview.

use planit_core::entities::{RequirementNode, RequirementRecord, RequirementsSelection};
use planit_core::meta::{
    ACTIVE_CATALOG_ID, ACTIVE_FACULTY_ID, ACTIVE_PATH, ACTIVE_PROGRAM_ID, PREVIEW_PROGRAM_ID,
};
use serde_json::Value;

use crate::PlanitDb;
use crate::error::StoreError;
use crate::helpers::{decode_json, finish};
use crate::repos::meta::{read_meta_string, remove_meta, upsert_meta_entries};

async fn upsert_requirement(
    conn: &libsql::Connection,
    record: &RequirementRecord,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO requirements (program_id, catalog_id, faculty_id, path, data)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(program_id) DO UPDATE SET
             catalog_id = excluded.catalog_id,
             faculty_id = excluded.faculty_id,
             path = excluded.path,
             data = excluded.data",
        libsql::params![
            record.program_id.as_str(),
            record.catalog_id.as_str(),
            record.faculty_id.as_str(),
            record.path.as_deref(),
            serde_json::to_string(&record.data)?
        ],
    )
    .await?;
    Ok(())
}

async fn delete_requirement(conn: &libsql::Connection, program_id: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM requirements WHERE program_id = ?1", [program_id])
        .await?;
    Ok(())
}

/// Delete the stored preview tree unless its program is in `keep`, and
/// forget the preview id.
async fn discard_preview(conn: &libsql::Connection, keep: &[&str]) -> Result<(), StoreError> {
    let preview = read_meta_string(conn, PREVIEW_PROGRAM_ID).await?;
    if let Some(preview) = preview.filter(|p| !p.is_empty() && !keep.contains(&p.as_str())) {
        delete_requirement(conn, &preview).await?;
    }
    remove_meta(conn, PREVIEW_PROGRAM_ID).await
}

fn selection_entries(
    catalog_id: &str,
    faculty_id: &str,
    program_id: &str,
    path: Option<&str>,
) -> [(&'static str, Value); 4] {
    [
        (ACTIVE_CATALOG_ID, Value::from(catalog_id)),
        (ACTIVE_FACULTY_ID, Value::from(faculty_id)),
        (ACTIVE_PROGRAM_ID, Value::from(program_id)),
        (ACTIVE_PATH, Value::from(path.unwrap_or_default())),
    ]
}

impl PlanitDb {
    /// Requirement tree stored for `program_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails or the row is corrupt.
    pub async fn get_requirement(
        &self,
        program_id: &str,
    ) -> Result<Option<RequirementRecord>, StoreError> {
        let conn = self.conn().await;
        let mut rows = conn
            .query(
                "SELECT program_id, catalog_id, faculty_id, path, data
                 FROM requirements WHERE program_id = ?1",
                [program_id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let data: RequirementNode = decode_json("requirements", &row.get::<String>(4)?)?;
        Ok(Some(RequirementRecord {
            program_id: row.get(0)?,
            catalog_id: row.get(1)?,
            faculty_id: row.get(2)?,
            path: row.get::<Option<String>>(3)?,
            data,
        }))
    }

    /// Store a previewed tree without touching the active selection.
    ///
    /// In one transaction: delete the previous preview tree (unless it is
    /// the active program or `record`'s program), upsert `record`, and
    /// remember it as the preview. Previewing the active program overwrites
    /// its tree and leaves no preview behind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any step fails; nothing is written.
    pub async fn preview_requirement(&self, record: &RequirementRecord) -> Result<(), StoreError> {
        let conn = self.conn().await;
        let tx = conn.transaction().await?;
        let result = async {
            let active = read_meta_string(&tx, ACTIVE_PROGRAM_ID).await?;
            let active = active.as_deref().unwrap_or_default();
            discard_preview(&tx, &[record.program_id.as_str(), active]).await?;
            upsert_requirement(&tx, record).await?;
            if record.program_id != active {
                upsert_meta_entries(
                    &tx,
                    &[(PREVIEW_PROGRAM_ID, Value::from(record.program_id.as_str()))],
                )
                .await?;
            }
            Ok(())
        }
        .await;
        finish(tx, result).await
    }

    /// Make `record` the active program's tree.
    ///
    /// In one transaction: upsert `record`, delete the tree stored under
    /// `previous_program_id` when it is non-empty and differs, drop any
    /// other preview tree, and point the four active selection meta keys at
    /// `record`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any step fails; nothing is written.
    pub async fn replace_requirement(
        &self,
        record: &RequirementRecord,
        previous_program_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let conn = self.conn().await;
        let tx = conn.transaction().await?;
        let result = async {
            upsert_requirement(&tx, record).await?;
            if let Some(previous) = previous_program_id
                .filter(|previous| !previous.is_empty() && *previous != record.program_id)
            {
                delete_requirement(&tx, previous).await?;
            }
            discard_preview(&tx, &[record.program_id.as_str()]).await?;
            upsert_meta_entries(
                &tx,
                &selection_entries(
                    &record.catalog_id,
                    &record.faculty_id,
                    &record.program_id,
                    record.path.as_deref(),
                ),
            )
            .await
        }
        .await;
        finish(tx, result).await?;
        tracing::debug!(
            program = %record.program_id,
            previous = ?previous_program_id,
            "replaced active requirements"
        );
        Ok(())
    }

    /// The active selection, if catalog, faculty, and program are all set.
    ///
    /// Entries that are not strings are treated as absent. An empty path
    /// means "no path".
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only for storage failures.
    pub async fn active_selection(&self) -> Result<Option<RequirementsSelection>, StoreError> {
        let catalog_id = self.get_meta_string(ACTIVE_CATALOG_ID).await?;
        let faculty_id = self.get_meta_string(ACTIVE_FACULTY_ID).await?;
        let program_id = self.get_meta_string(ACTIVE_PROGRAM_ID).await?;
        let path = self.get_meta_string(ACTIVE_PATH).await?;

        let (Some(catalog_id), Some(faculty_id), Some(program_id)) =
            (catalog_id, faculty_id, program_id)
        else {
            return Ok(None);
        };
        let selection = RequirementsSelection::new(catalog_id, faculty_id, program_id, path);
        Ok(selection.is_complete().then_some(selection))
    }

    /// Record `selection` as active without writing a requirement tree.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn set_active_selection(
        &self,
        selection: &RequirementsSelection,
    ) -> Result<(), StoreError> {
        self.set_meta_entries(&selection_entries(
            &selection.catalog_id,
            &selection.faculty_id,
            &selection.program_id,
            selection.path.as_deref(),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(program: &str, path: Option<&str>) -> RequirementRecord {
        RequirementsSelection::new("2024_200", "cs", program, path.map(Into::into)).into_record(
            RequirementNode {
                name: Some(program.into()),
                courses: Some(vec!["234114".into()]),
                ..RequirementNode::default()
            },
        )
    }

    async fn program_count(db: &PlanitDb) -> i64 {
        let conn = db.conn().await;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM requirements", ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn switching_programs_removes_previous_tree() {
        let db = test_db().await;
        db.replace_requirement(&record("P1", None), None).await.unwrap();
        db.replace_requirement(&record("P2", Some("PATH_A")), Some("P1"))
            .await
            .unwrap();

        assert_eq!(db.get_requirement("P1").await.unwrap(), None);
        assert_eq!(db.get_requirement("P2").await.unwrap(), Some(record("P2", Some("PATH_A"))));
        assert_eq!(program_count(&db).await, 1);
        assert_eq!(
            db.get_meta(ACTIVE_PROGRAM_ID).await.unwrap(),
            Some(json!("P2"))
        );
        assert_eq!(db.get_meta(ACTIVE_PATH).await.unwrap(), Some(json!("PATH_A")));
    }

    #[tokio::test]
    async fn same_program_is_not_deleted() {
        let db = test_db().await;
        db.replace_requirement(&record("P1", None), None).await.unwrap();
        db.replace_requirement(&record("P1", None), Some("P1")).await.unwrap();
        assert!(db.get_requirement("P1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn preview_keeps_active_selection() {
        let db = test_db().await;
        db.replace_requirement(&record("P1", None), None).await.unwrap();
        db.preview_requirement(&record("P9", None)).await.unwrap();

        assert!(db.get_requirement("P1").await.unwrap().is_some());
        assert!(db.get_requirement("P9").await.unwrap().is_some());
        let active = db.active_selection().await.unwrap().unwrap();
        assert_eq!(active.program_id, "P1");
        assert_eq!(active.path, None);
        assert_eq!(
            db.get_meta(PREVIEW_PROGRAM_ID).await.unwrap(),
            Some(json!("P9"))
        );
    }

    #[tokio::test]
    async fn switching_programs_drops_the_preview_tree() {
        let db = test_db().await;
        db.replace_requirement(&record("P1", None), None).await.unwrap();
        db.preview_requirement(&record("P3", None)).await.unwrap();
        db.replace_requirement(&record("P2", None), Some("P1"))
            .await
            .unwrap();

        assert_eq!(db.get_requirement("P3").await.unwrap(), None);
        assert_eq!(db.get_requirement("P1").await.unwrap(), None);
        assert_eq!(program_count(&db).await, 1);
        assert_eq!(db.get_meta(PREVIEW_PROGRAM_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn committing_the_previewed_program_keeps_it() {
        let db = test_db().await;
        db.replace_requirement(&record("P1", None), None).await.unwrap();
        db.preview_requirement(&record("P3", None)).await.unwrap();
        db.replace_requirement(&record("P3", None), Some("P1"))
            .await
            .unwrap();

        assert!(db.get_requirement("P3").await.unwrap().is_some());
        assert_eq!(program_count(&db).await, 1);
        assert_eq!(db.get_meta(PREVIEW_PROGRAM_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn only_the_latest_preview_is_kept() {
        let db = test_db().await;
        db.replace_requirement(&record("P1", None), None).await.unwrap();
        db.preview_requirement(&record("P3", None)).await.unwrap();
        db.preview_requirement(&record("P4", None)).await.unwrap();
        db.preview_requirement(&record("P1", Some("PATH_A"))).await.unwrap();

        assert_eq!(db.get_requirement("P3").await.unwrap(), None);
        assert_eq!(db.get_requirement("P4").await.unwrap(), None);
        assert!(db.get_requirement("P1").await.unwrap().is_some());
        assert_eq!(program_count(&db).await, 1);
        assert_eq!(db.get_meta(PREVIEW_PROGRAM_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn active_selection_requires_all_ids() {
        let db = test_db().await;
        assert_eq!(db.active_selection().await.unwrap(), None);

        db.set_meta(ACTIVE_CATALOG_ID, &json!("2024_200")).await.unwrap();
        db.set_meta(ACTIVE_FACULTY_ID, &json!("cs")).await.unwrap();
        db.set_meta(ACTIVE_PROGRAM_ID, &json!(42)).await.unwrap();
        assert_eq!(db.active_selection().await.unwrap(), None);

        db.set_meta(ACTIVE_PROGRAM_ID, &json!("")).await.unwrap();
        assert_eq!(db.active_selection().await.unwrap(), None);

        let selection = RequirementsSelection::new("2024_200", "cs", "swe", Some("PATH_B".into()));
        db.set_active_selection(&selection).await.unwrap();
        assert_eq!(db.active_selection().await.unwrap(), Some(selection));
    }
}
