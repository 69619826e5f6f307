//! # planit-db
//!
//! libSQL-backed local store for the Planit offline course cache.
//!
//! Four collections live in one versioned database file:
//! - `courses` keyed by course code, with sort helper columns for paging
//! - `meta` key/value entries (sync provenance, active selection, plan state)
//! - `catalogs` keyed by catalog id
//! - `requirements` keyed by program id
//!
//! Every multi-row write runs inside one transaction. A failed write leaves
//! no trace, so readers only ever see the old or the new data set.

pub mod error;
mod helpers;
mod migrations;
pub mod repos;

pub use error::StoreError;
pub use migrations::SCHEMA_VERSION;

use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

/// Handle to the local store.
///
/// The single connection is guarded so that one task's transaction never
/// interleaves with another task's statements. Cloning is not supported;
/// share the handle behind an `Arc`.
pub struct PlanitDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Mutex<libsql::Connection>,
}

impl PlanitDb {
    /// Open (or create) a local database and bring its schema up to date.
    ///
    /// Pass `":memory:"` for a throwaway store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be opened and
    /// [`StoreError::Migration`] if the schema cannot be upgraded.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("{path}: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("{path}: {e}")))?;

        let store = Self {
            db,
            conn: Mutex::new(conn),
        };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Exclusive access to the underlying connection.
    pub(crate) async fn conn(&self) -> MutexGuard<'_, libsql::Connection> {
        self.conn.lock().await
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::test_db;

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let conn = db.conn().await;

        for table in ["courses", "meta", "catalogs", "requirements"] {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }

        for index in [
            "idx_courses_sort_name",
            "idx_courses_sort_points",
            "idx_courses_sort_median",
        ] {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type='index' AND name=?1",
                    [index],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "index '{index}' should exist");
        }
    }
}
