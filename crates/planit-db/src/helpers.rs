//! Row decoding, sort-field derivation, and transaction helpers.

use planit_core::entities::Course;
use planit_core::enums::SortKey;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Decode a JSON TEXT column into a record.
pub(crate) fn decode_json<T: DeserializeOwned>(
    table: &'static str,
    raw: &str,
) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Decode {
        table,
        reason: e.to_string(),
    })
}

/// Convert a count or offset into an SQL integer parameter.
pub(crate) fn sql_int(value: usize, what: &str) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidArgument(format!("{what} {value} is too large")))
}

/// Read a non-negative SQL integer as `usize`.
pub(crate) fn from_sql_int(value: i64) -> Result<usize, StoreError> {
    usize::try_from(value)
        .map_err(|_| StoreError::InvalidArgument(format!("negative count {value}")))
}

/// Indexed sort helper values derived from a course record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SortFields {
    pub name: Option<String>,
    pub points: Option<f64>,
    pub median: Option<f64>,
}

impl SortFields {
    pub(crate) fn of(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            points: course.points.filter(|p| p.is_finite()),
            median: course.median.filter(|m| m.is_finite()),
        }
    }
}

/// Column backing a sort key. Missing values are stored as NULL.
pub(crate) const fn sort_column(key: SortKey) -> &'static str {
    match key {
        SortKey::Code => "code",
        SortKey::Name => "sort_name",
        SortKey::Points => "sort_points",
        SortKey::Median => "sort_median",
    }
}

/// Commit on success, roll back on failure, and hand back the result.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(%rollback, "transaction rollback failed");
            }
            Err(error)
        }
    }
}
