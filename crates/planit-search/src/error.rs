//! Search error types for planit-search.

/// Errors from course queries.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Error from the local store while scanning courses.
    #[error("store error: {0}")]
    Store(#[from] planit_db::StoreError),
}
