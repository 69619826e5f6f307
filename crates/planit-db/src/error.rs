//! Store error types for planit-db.

use thiserror::Error;

/// Errors from local store operations.
///
/// Every variant is a storage failure. Network failures live in
/// `planit-sync` and never surface through this type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// Schema migration failed or the file was written by a newer schema.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A stored row could not be decoded into its record type.
    #[error("Corrupt record in '{table}': {reason}")]
    Decode { table: &'static str, reason: String },

    /// The caller passed a value the store cannot represent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying libSQL error, including aborted transactions.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
