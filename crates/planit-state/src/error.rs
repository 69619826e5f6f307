//! State provider error types.

use planit_core::errors::CoreError;
use planit_db::StoreError;
use planit_search::SearchError;
use planit_sync::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A value handed to the provider failed validation.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}
