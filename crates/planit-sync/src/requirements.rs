//! Requirement tree sync for one selected program.
//!
//! Unlike the whole-collection datasets this has no conditional fetch and
//! no freshness probe: each run downloads the program's tree and swaps it
//! in with the store's copy-on-write replace.

use planit_core::entities::{RequirementNode, RequirementsSelection};
use planit_core::enums::Dataset;
use planit_core::meta::{ACTIVE_PROGRAM_ID, REQUIREMENTS_LAST_SYNC};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::engine::{SyncContext, timestamp};
use crate::error::SyncError;
use crate::fetch::FetchRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementsSyncOptions {
    /// Make the synced program the active selection. Off when the caller is
    /// only previewing a program.
    pub persist_active_selection: bool,
}

impl Default for RequirementsSyncOptions {
    fn default() -> Self {
        Self {
            persist_active_selection: true,
        }
    }
}

impl RequirementsSyncOptions {
    #[must_use]
    pub const fn preview() -> Self {
        Self {
            persist_active_selection: false,
        }
    }
}

/// Result of a requirements sync as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequirementsSyncResult {
    Updated,
    Offline,
    Failed { error: String },
}

impl RequirementsSyncResult {
    /// Fold remote failures into [`Self::Failed`]. Store failures stay errors.
    ///
    /// # Errors
    ///
    /// Returns the original error when it is a [`SyncError::Store`].
    pub fn fold(result: Result<Self, SyncError>) -> Result<Self, SyncError> {
        match result {
            Err(error) if error.is_remote() => Ok(Self::Failed {
                error: error.to_string(),
            }),
            other => other,
        }
    }
}

pub struct RequirementsSync {
    ctx: SyncContext,
}

impl RequirementsSync {
    #[must_use]
    pub const fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Location of a program's published tree.
    #[must_use]
    pub fn data_url(&self, selection: &RequirementsSelection) -> String {
        self.ctx.remote.data_url(&format!(
            "_catalogs/{}/{}/{}/requirementsData.json",
            selection.catalog_id, selection.faculty_id, selection.program_id
        ))
    }

    /// Download and store the tree for `selection`.
    ///
    /// Never returns [`RequirementsSyncResult::Failed`]; see
    /// [`RequirementsSyncResult::fold`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Status`] or [`SyncError::Payload`] for remote
    /// failures and [`SyncError::Store`] if the replace fails. The stored
    /// trees and active selection are unchanged in every error case.
    pub async fn sync(
        &self,
        selection: &RequirementsSelection,
        options: RequirementsSyncOptions,
    ) -> Result<RequirementsSyncResult, SyncError> {
        let dataset = Dataset::Requirements;
        if !self.ctx.connectivity.is_online() {
            return Ok(RequirementsSyncResult::Offline);
        }

        let store = &self.ctx.store;
        let previous_program = store.get_meta_string(ACTIVE_PROGRAM_ID).await?;

        let url = self.data_url(selection);
        let response = self.ctx.fetcher.fetch(FetchRequest::get(&url)).await?;
        if !response.is_success() {
            tracing::warn!(%dataset, %url, status = response.status, "requirements fetch failed");
            return Err(SyncError::Status {
                dataset,
                url,
                status: response.status,
            });
        }
        let tree: RequirementNode =
            serde_json::from_str(&response.body).map_err(|e| SyncError::Payload {
                dataset,
                url: url.clone(),
                message: e.to_string(),
            })?;

        let record = selection.clone().into_record(tree);
        if options.persist_active_selection {
            store
                .replace_requirement(&record, previous_program.as_deref())
                .await?;
        } else {
            store.preview_requirement(&record).await?;
        }
        store
            .set_meta(REQUIREMENTS_LAST_SYNC, &json!(timestamp()))
            .await?;

        tracing::info!(
            program = %record.program_id,
            active = options.persist_active_selection,
            "requirements updated"
        );
        Ok(RequirementsSyncResult::Updated)
    }
}
