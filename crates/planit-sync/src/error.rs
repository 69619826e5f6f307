//! Sync error types.

use planit_core::enums::Dataset;
use planit_db::StoreError;
use thiserror::Error;

/// Errors that end a sync run without touching the synced collection.
///
/// Being offline is not an error; it is reported as a normal outcome.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection-level failure before any response arrived.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status other than success or 304.
    #[error("{dataset} fetch failed ({status}): {url}")]
    Status {
        dataset: Dataset,
        url: String,
        status: u16,
    },

    /// The response body is not the shape the dataset expects.
    #[error("{dataset} payload from {url} is malformed: {message}")]
    Payload {
        dataset: Dataset,
        url: String,
        message: String,
    },

    /// Reading or writing the local store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// HTTP status of the failed response, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure came from the network side rather than the store.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_only_for_http_failures() {
        let err = SyncError::Status {
            dataset: Dataset::Courses,
            url: "https://example.test/courseData.json".into(),
            status: 503,
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.is_remote());
        assert_eq!(
            err.to_string(),
            "courses fetch failed (503): https://example.test/courseData.json"
        );

        let err = SyncError::Store(StoreError::NoResult);
        assert_eq!(err.status(), None);
        assert!(!err.is_remote());
    }
}
