//! The conditional-fetch protocol shared by every whole-collection dataset.
//!
//! One run walks these states:
//! 1. offline: stop, nothing fetched or written
//! 2. freshness probe: ask the commit history for the data file's last
//!    change; failures are logged and treated as unknown freshness
//! 3. skip decision: unchanged upstream stamp plus a recorded last sync
//!    means no download
//! 4. conditional fetch with `If-None-Match` / `If-Modified-Since`; a 304
//!    only refreshes the last sync time
//! 5. full replace: one batch write, then one provenance write

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use planit_config::{PlanitConfig, RemoteConfig};
use planit_core::enums::Dataset;
use planit_db::PlanitDb;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::connectivity::Connectivity;
use crate::error::SyncError;
use crate::fetch::{FetchRequest, Fetcher};
use crate::snapshot::{CatalogSnapshot, CourseSnapshot, Snapshot};

/// Everything a sync run needs, shared by all dataset instances.
#[derive(Clone)]
pub struct SyncContext {
    pub store: Arc<PlanitDb>,
    pub fetcher: Arc<dyn Fetcher>,
    pub remote: Arc<RemoteConfig>,
    pub connectivity: Connectivity,
    pub probe_freshness: bool,
}

impl SyncContext {
    #[must_use]
    pub fn new(
        store: Arc<PlanitDb>,
        fetcher: Arc<dyn Fetcher>,
        remote: RemoteConfig,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            store,
            fetcher,
            remote: Arc::new(remote),
            connectivity,
            probe_freshness: true,
        }
    }

    /// Context wired from loaded configuration. `sync.offline` starts the
    /// connectivity flag offline.
    #[must_use]
    pub fn from_config(
        store: Arc<PlanitDb>,
        fetcher: Arc<dyn Fetcher>,
        config: &PlanitConfig,
    ) -> Self {
        Self {
            probe_freshness: config.sync.probe_freshness,
            ..Self::new(
                store,
                fetcher,
                config.remote.clone(),
                Connectivity::new(!config.sync.offline),
            )
        }
    }

    #[must_use]
    pub const fn with_probe(mut self, probe_freshness: bool) -> Self {
        self.probe_freshness = probe_freshness;
        self
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("remote", &self.remote)
            .field("online", &self.connectivity.is_online())
            .field("probe_freshness", &self.probe_freshness)
            .finish_non_exhaustive()
    }
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Updated,
    Skipped,
    Offline,
}

/// What a run did to one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub dataset: Dataset,
    pub status: SyncStatus,
    /// Records written, set only when `status` is `Updated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl SyncReport {
    const fn new(dataset: Dataset, status: SyncStatus) -> Self {
        Self {
            dataset,
            status,
            count: None,
        }
    }
}

/// Current time in the format stored under every timestamp meta key.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Sync engine for one whole-collection dataset.
pub struct SnapshotSync<S> {
    ctx: SyncContext,
    snapshot: PhantomData<fn() -> S>,
}

pub type CourseSync = SnapshotSync<CourseSnapshot>;
pub type CatalogSync = SnapshotSync<CatalogSnapshot>;

impl<S: Snapshot> SnapshotSync<S> {
    #[must_use]
    pub const fn new(ctx: SyncContext) -> Self {
        Self {
            ctx,
            snapshot: PhantomData,
        }
    }

    #[must_use]
    pub const fn dataset(&self) -> Dataset {
        S::DATASET
    }

    #[must_use]
    pub fn data_url(&self) -> String {
        self.ctx.remote.data_url(S::FILE)
    }

    /// Commit history query for the dataset's file, newest commit only.
    #[must_use]
    pub fn probe_url(&self) -> String {
        let path = self.ctx.remote.repo_path(S::FILE);
        format!(
            "{}?path={}&per_page=1",
            self.ctx.remote.commits_api_url,
            urlencoding::encode(&path)
        )
    }

    /// Run the protocol once.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Status`] for a failed download,
    /// [`SyncError::Payload`] for an unusable body, and
    /// [`SyncError::Store`] for storage failures. The stored collection is
    /// unchanged in every error case.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let dataset = S::DATASET;
        if !self.ctx.connectivity.is_online() {
            tracing::debug!(%dataset, "offline, sync skipped");
            return Ok(SyncReport::new(dataset, SyncStatus::Offline));
        }

        let store = &self.ctx.store;
        let keys = S::KEYS;
        let previous_stamp = store.get_meta_string(keys.remote_updated_at).await?;

        let probed = if self.ctx.probe_freshness {
            self.probe().await
        } else {
            None
        };
        if let Some(stamp) = &probed {
            store
                .set_meta_entries(&[
                    (keys.remote_updated_at, json!(stamp)),
                    (keys.last_checked, json!(timestamp())),
                ])
                .await?;

            let unchanged = previous_stamp
                .as_deref()
                .is_some_and(|prev| !prev.is_empty() && prev == stamp);
            if unchanged && store.get_meta(keys.last_sync).await?.is_some() {
                tracing::debug!(%dataset, %stamp, "remote unchanged, download skipped");
                return Ok(SyncReport::new(dataset, SyncStatus::Skipped));
            }
        }

        match self.download(probed.as_deref()).await {
            Ok(report) => Ok(report),
            Err(error) => {
                if probed.is_some() {
                    self.restore_stamp(previous_stamp).await;
                }
                Err(error)
            }
        }
    }

    /// Latest commit date of the dataset's file, or `None` when unknown.
    async fn probe(&self) -> Option<String> {
        let dataset = S::DATASET;
        let url = self.probe_url();
        let request = FetchRequest::get(&url).header("Accept", "application/vnd.github+json");
        let response = match self.ctx.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%dataset, %url, %error, "freshness probe failed");
                return None;
            }
        };
        if !response.is_success() {
            tracing::warn!(%dataset, %url, status = response.status, "freshness probe failed");
            return None;
        }
        match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => latest_commit_date(&value),
            Err(error) => {
                tracing::warn!(%dataset, %url, %error, "freshness probe returned malformed JSON");
                None
            }
        }
    }

    async fn download(&self, probed: Option<&str>) -> Result<SyncReport, SyncError> {
        let dataset = S::DATASET;
        let store = &self.ctx.store;
        let keys = S::KEYS;
        let url = self.data_url();

        let mut request = FetchRequest::get(&url);
        if let Some(etag) = non_empty(store.get_meta_string(keys.etag).await?) {
            request = request.header("If-None-Match", etag);
        }
        if let Some(modified) = non_empty(store.get_meta_string(keys.last_modified).await?) {
            request = request.header("If-Modified-Since", modified);
        }

        let response = self.ctx.fetcher.fetch(request).await?;
        if response.is_not_modified() {
            store.set_meta(keys.last_sync, &json!(timestamp())).await?;
            tracing::debug!(%dataset, "not modified");
            return Ok(SyncReport::new(dataset, SyncStatus::Skipped));
        }
        if !response.is_success() {
            tracing::warn!(%dataset, %url, status = response.status, "dataset fetch failed");
            return Err(SyncError::Status {
                dataset,
                url,
                status: response.status,
            });
        }

        let records = S::parse(&response.body).map_err(|message| SyncError::Payload {
            dataset,
            url: url.clone(),
            message,
        })?;
        let count = S::count(&records);
        S::persist(store, &records).await?;

        let mut provenance = vec![
            (keys.last_sync, json!(timestamp())),
            (keys.count, json!(count)),
        ];
        if let Some(etag) = response.etag {
            provenance.push((keys.etag, json!(etag)));
        }
        if let Some(modified) = response.last_modified {
            provenance.push((keys.last_modified, json!(modified)));
        }
        if let Some(stamp) = probed {
            provenance.push((keys.remote_updated_at, json!(stamp)));
        }
        store.set_meta_entries(&provenance).await?;

        tracing::info!(%dataset, count, "dataset updated");
        Ok(SyncReport {
            dataset,
            status: SyncStatus::Updated,
            count: Some(count),
        })
    }

    /// Put back the upstream stamp recorded before this run's probe.
    async fn restore_stamp(&self, previous: Option<String>) {
        let key = S::KEYS.remote_updated_at;
        let result = match previous {
            Some(value) => self.ctx.store.set_meta(key, &json!(value)).await,
            None => self.ctx.store.delete_meta(key).await,
        };
        if let Err(error) = result {
            tracing::warn!(dataset = %S::DATASET, %error, "failed to restore remote stamp");
        }
    }
}

/// `[0].commit.committer.date` of a commit list, if it is a non-empty string.
#[must_use]
pub fn latest_commit_date(commits: &Value) -> Option<String> {
    commits
        .get(0)?
        .pointer("/commit/committer/date")?
        .as_str()
        .filter(|date| !date.is_empty())
        .map(String::from)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
