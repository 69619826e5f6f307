//! Meta collection: last-writer-wins key/value entries holding JSON.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::PlanitDb;
use crate::error::StoreError;
use crate::helpers::{decode_json, finish};

async fn upsert_meta(
    conn: &libsql::Connection,
    key: &str,
    value: &Value,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        libsql::params![key, serde_json::to_string(value)?],
    )
    .await?;
    Ok(())
}

/// Write several meta entries on an open connection or transaction.
pub(crate) async fn upsert_meta_entries(
    conn: &libsql::Connection,
    entries: &[(&str, Value)],
) -> Result<(), StoreError> {
    for (key, value) in entries {
        upsert_meta(conn, key, value).await?;
    }
    Ok(())
}

async fn read_meta(conn: &libsql::Connection, key: &str) -> Result<Option<Value>, StoreError> {
    let mut rows = conn
        .query("SELECT value FROM meta WHERE key = ?1", [key])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode_json("meta", &row.get::<String>(0)?)?)),
        None => Ok(None),
    }
}

/// String meta entry read on an open connection or transaction. Other
/// shapes read as absent.
pub(crate) async fn read_meta_string(
    conn: &libsql::Connection,
    key: &str,
) -> Result<Option<String>, StoreError> {
    Ok(read_meta(conn, key)
        .await?
        .and_then(|value| value.as_str().map(String::from)))
}

pub(crate) async fn remove_meta(conn: &libsql::Connection, key: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM meta WHERE key = ?1", [key]).await?;
    Ok(())
}

impl PlanitDb {
    /// Raw JSON value of a meta entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails or the stored text is not JSON.
    pub async fn get_meta(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.conn().await;
        read_meta(&conn, key).await
    }

    /// Meta entry decoded as `T`.
    ///
    /// A stored value of a different shape is treated as absent and logged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only for storage failures.
    pub async fn get_meta_as<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        let Some(value) = self.get_meta(key).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(typed) => Ok(Some(typed)),
            Err(error) => {
                tracing::warn!(key, %error, "ignoring meta entry with unexpected shape");
                Ok(None)
            }
        }
    }

    /// Meta entry that must be a string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only for storage failures.
    pub async fn get_meta_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_meta_as::<String>(key).await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn set_meta(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let conn = self.conn().await;
        upsert_meta(&conn, key, value).await
    }

    /// Write several meta entries in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write fails; none are kept.
    pub async fn set_meta_entries(&self, entries: &[(&str, Value)]) -> Result<(), StoreError> {
        let conn = self.conn().await;
        let tx = conn.transaction().await?;
        let result = upsert_meta_entries(&tx, entries).await;
        finish(tx, result).await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete fails.
    pub async fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.conn().await;
        remove_meta(&conn, key).await
    }
}
