//! Cross-cutting error types for Planit.
//!
//! Storage, search, and sync errors are defined in their own crates.
//! `CoreError` covers validation of persisted payloads and record shapes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A versioned payload carried a version this build cannot read.
    #[error("Unsupported payload version {found} (supported: {supported})")]
    UnsupportedVersion { found: u64, supported: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
