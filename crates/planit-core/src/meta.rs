//! Names of persisted meta entries.
//!
//! The names are part of the on-disk format: existing caches store
//! provenance and user state under exactly these keys.

use crate::enums::Dataset;

/// Provenance keys recorded by a whole-collection dataset sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMetaKeys {
    pub etag: &'static str,
    pub last_modified: &'static str,
    pub last_sync: &'static str,
    pub count: &'static str,
    pub remote_updated_at: &'static str,
    pub last_checked: &'static str,
}

pub const COURSE_SYNC_KEYS: SyncMetaKeys = SyncMetaKeys {
    etag: "courseDataEtag",
    last_modified: "courseDataLastModified",
    last_sync: "courseDataLastSync",
    count: "courseDataCount",
    remote_updated_at: "courseDataRemoteUpdatedAt",
    last_checked: "courseDataLastChecked",
};

pub const CATALOG_SYNC_KEYS: SyncMetaKeys = SyncMetaKeys {
    etag: "catalogsDataEtag",
    last_modified: "catalogsDataLastModified",
    last_sync: "catalogsDataLastSync",
    count: "catalogsDataCount",
    remote_updated_at: "catalogsDataRemoteUpdatedAt",
    last_checked: "catalogsDataLastChecked",
};

impl SyncMetaKeys {
    /// Keys for a whole-collection dataset. Requirements have no collection
    /// level provenance and return `None`.
    #[must_use]
    pub const fn for_dataset(dataset: Dataset) -> Option<Self> {
        match dataset {
            Dataset::Courses => Some(COURSE_SYNC_KEYS),
            Dataset::Catalogs => Some(CATALOG_SYNC_KEYS),
            Dataset::Requirements => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

pub const REQUIREMENTS_LAST_SYNC: &str = "requirementsLastSync";
pub const ACTIVE_CATALOG_ID: &str = "requirementsActiveCatalogId";
pub const ACTIVE_FACULTY_ID: &str = "requirementsActiveFacultyId";
pub const ACTIVE_PROGRAM_ID: &str = "requirementsActiveProgramId";
pub const ACTIVE_PATH: &str = "requirementsActivePath";
/// Program whose tree was stored by a preview sync. At most one preview tree
/// is kept next to the active one.
pub const PREVIEW_PROGRAM_ID: &str = "requirementsPreviewProgramId";

// ---------------------------------------------------------------------------
// User state
// ---------------------------------------------------------------------------

pub const PLAN_STATE: &str = "planPageState";
