//! Catalog collection keyed by catalog id.

use planit_core::entities::Catalogs;

use crate::PlanitDb;
use crate::error::StoreError;
use crate::helpers::{decode_json, finish};

impl PlanitDb {
    /// Every stored catalog, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails or a row is corrupt.
    pub async fn get_catalogs(&self) -> Result<Catalogs, StoreError> {
        let conn = self.conn().await;
        let mut rows = conn
            .query("SELECT id, data FROM catalogs ORDER BY id", ())
            .await?;
        let mut catalogs = Catalogs::new();
        while let Some(row) = rows.next().await? {
            let id = row.get::<String>(0)?;
            let data = decode_json("catalogs", &row.get::<String>(1)?)?;
            catalogs.insert(id, data);
        }
        Ok(catalogs)
    }

    /// Upsert every catalog in `catalogs` in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write fails; none are kept.
    pub async fn put_catalogs(&self, catalogs: &Catalogs) -> Result<(), StoreError> {
        let conn = self.conn().await;
        let tx = conn.transaction().await?;
        let result = async {
            for (id, data) in catalogs {
                tx.execute(
                    "INSERT INTO catalogs (id, data) VALUES (?1, ?2)
                     ON CONFLICT(id) DO UPDATE SET data = excluded.data",
                    libsql::params![id.as_str(), serde_json::to_string(data)?],
                )
                .await?;
            }
            Ok::<(), StoreError>(())
        }
        .await;
        finish(tx, result).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_db;
    use planit_core::entities::Catalogs;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn put_and_get_catalog_map() {
        let db = test_db().await;
        assert!(db.get_catalogs().await.unwrap().is_empty());

        let mut catalogs = Catalogs::new();
        catalogs.insert("2024_200".into(), json!({"cs": {"en": "Computer Science"}}));
        catalogs.insert("2025_200".into(), json!({"math": {"en": "Math"}}));
        db.put_catalogs(&catalogs).await.unwrap();

        assert_eq!(db.get_catalogs().await.unwrap(), catalogs);
    }

    #[tokio::test]
    async fn put_overwrites_existing_catalog() {
        let db = test_db().await;
        let mut catalogs = Catalogs::new();
        catalogs.insert("2024_200".into(), json!({"old": {}}));
        db.put_catalogs(&catalogs).await.unwrap();

        catalogs.insert("2024_200".into(), json!({"new": {}}));
        db.put_catalogs(&catalogs).await.unwrap();

        let stored = db.get_catalogs().await.unwrap();
        assert_eq!(stored.get("2024_200"), Some(&json!({"new": {}})));
    }
}
