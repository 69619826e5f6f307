//! # planit-sync
//!
//! Keeps the local store in step with the published data files.
//!
//! Courses and catalogs are whole-collection datasets: each run probes the
//! upstream commit history, downloads conditionally, and replaces the
//! collection in one transaction before recording provenance (etag,
//! last-modified, last sync, count, upstream stamp). Requirements are synced
//! one program at a time through the store's copy-on-write replace.
//!
//! Nothing here mutates the store on failure. Being offline is a normal
//! outcome, not an error. Concurrent runs are allowed; each batch write is
//! atomic, so readers only ever see a complete collection.

pub mod connectivity;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod requirements;
pub mod runner;
pub mod snapshot;

pub use connectivity::Connectivity;
pub use engine::{CatalogSync, CourseSync, SnapshotSync, SyncContext, SyncReport, SyncStatus};
pub use error::SyncError;
pub use fetch::{FetchRequest, FetchResponse, Fetcher, HttpFetcher};
pub use requirements::{RequirementsSync, RequirementsSyncOptions, RequirementsSyncResult};
pub use runner::{SyncEvent, SyncJob, SyncListener, SyncRunner};
pub use snapshot::{CatalogSnapshot, CourseSnapshot, Snapshot};
