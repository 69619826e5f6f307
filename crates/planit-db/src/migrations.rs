//! Versioned schema migrations.
//!
//! The applied version is kept in `PRAGMA user_version`. Opening a store runs
//! every migration newer than that version, each in its own transaction
//! together with its backfill and the version bump.

use crate::PlanitDb;
use crate::error::StoreError;
use crate::helpers::{SortFields, decode_json, finish};

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 3;

/// Data rewrite that has to follow a schema change.
#[derive(Debug, Clone, Copy)]
enum Backfill {
    CourseSortFields,
}

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
    backfill: Option<Backfill>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "001_initial",
        sql: include_str!("../migrations/001_initial.sql"),
        backfill: None,
    },
    Migration {
        version: 2,
        name: "002_catalogs",
        sql: include_str!("../migrations/002_catalogs.sql"),
        backfill: None,
    },
    Migration {
        version: 3,
        name: "003_sort_fields",
        sql: include_str!("../migrations/003_sort_fields.sql"),
        backfill: Some(Backfill::CourseSortFields),
    },
];

impl PlanitDb {
    /// Apply every pending migration in order.
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        let conn = self.conn().await;
        let current = schema_version(&conn).await?;
        if current > SCHEMA_VERSION {
            return Err(StoreError::Migration(format!(
                "store schema version {current} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            let tx = conn.transaction().await?;
            let result = apply(&tx, migration).await;
            finish(tx, result)
                .await
                .map_err(|e| StoreError::Migration(format!("{}: {e}", migration.name)))?;
            tracing::debug!(
                version = migration.version,
                name = migration.name,
                "applied migration"
            );
        }
        Ok(())
    }
}

async fn schema_version(conn: &libsql::Connection) -> Result<i64, StoreError> {
    let mut rows = conn.query("PRAGMA user_version", ()).await?;
    let row = rows.next().await?.ok_or(StoreError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

async fn apply(conn: &libsql::Connection, migration: &Migration) -> Result<(), StoreError> {
    conn.execute_batch(migration.sql).await?;
    if let Some(backfill) = migration.backfill {
        run_backfill(conn, backfill).await?;
    }
    conn.execute(&format!("PRAGMA user_version = {}", migration.version), ())
        .await?;
    Ok(())
}

async fn run_backfill(conn: &libsql::Connection, backfill: Backfill) -> Result<(), StoreError> {
    match backfill {
        Backfill::CourseSortFields => {
            let mut stored = Vec::new();
            let mut rows = conn.query("SELECT code, data FROM courses", ()).await?;
            while let Some(row) = rows.next().await? {
                stored.push((row.get::<String>(0)?, row.get::<String>(1)?));
            }
            drop(rows);

            for (code, data) in &stored {
                let course = decode_json("courses", data)?;
                let fields = SortFields::of(&course);
                conn.execute(
                    "UPDATE courses SET sort_name = ?1, sort_points = ?2, sort_median = ?3
                     WHERE code = ?4",
                    libsql::params![fields.name, fields.points, fields.median, code.as_str()],
                )
                .await?;
            }
            tracing::info!(rows = stored.len(), "backfilled course sort fields");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn fresh_store_is_at_current_version() {
        let db = test_db().await;
        let conn = db.conn().await;
        assert_eq!(schema_version(&conn).await.unwrap(), SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn rerunning_migrations_is_a_no_op() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        let conn = db.conn().await;
        assert_eq!(schema_version(&conn).await.unwrap(), SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn newer_schema_is_rejected() {
        let db = test_db().await;
        {
            let conn = db.conn().await;
            conn.execute("PRAGMA user_version = 99", ()).await.unwrap();
        }
        let err = db.run_migrations().await.unwrap_err();
        assert!(matches!(err, StoreError::Migration(_)));
        assert!(err.to_string().contains("99"));
    }
}
