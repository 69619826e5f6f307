//! Background sync triggered at startup and on every reconnect.

use std::sync::Arc;

use async_trait::async_trait;
use planit_core::enums::Dataset;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::connectivity::Connectivity;
use crate::engine::{SnapshotSync, SyncReport};
use crate::error::SyncError;
use crate::snapshot::Snapshot;

const EVENT_CAPACITY: usize = 64;

/// A dataset sync the runner can drive.
#[async_trait]
pub trait SyncJob: Send + Sync {
    fn dataset(&self) -> Dataset;
    async fn run(&self) -> Result<SyncReport, SyncError>;
}

#[async_trait]
impl<S: Snapshot> SyncJob for SnapshotSync<S> {
    fn dataset(&self) -> Dataset {
        S::DATASET
    }

    async fn run(&self) -> Result<SyncReport, SyncError> {
        self.sync().await
    }
}

/// Callbacks for finished runs. Both default to doing nothing.
pub trait SyncListener: Send + Sync {
    fn on_sync(&self, _report: &SyncReport) {}
    fn on_error(&self, _dataset: Dataset, _error: &SyncError) {}
}

/// Broadcast after every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncEvent {
    Completed(SyncReport),
    Failed { dataset: Dataset, error: String },
}

/// Runs a set of dataset syncs whenever the network comes back.
///
/// Runs are not serialized: a reconnect while a previous run is still in
/// flight starts another one.
pub struct SyncRunner {
    jobs: Vec<Arc<dyn SyncJob>>,
    connectivity: Connectivity,
    listener: Option<Arc<dyn SyncListener>>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncRunner {
    #[must_use]
    pub fn new(connectivity: Connectivity) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            jobs: Vec::new(),
            connectivity,
            listener: None,
            events,
        }
    }

    #[must_use]
    pub fn with_job(mut self, job: Arc<dyn SyncJob>) -> Self {
        self.jobs.push(job);
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn SyncListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Run every job once, in order, and report each result.
    ///
    /// Failures are logged and reported, never propagated.
    pub async fn run_once(&self) -> Vec<Result<SyncReport, SyncError>> {
        let mut results = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            let result = job.run().await;
            self.dispatch(job.dataset(), &result);
            results.push(result);
        }
        results
    }

    fn dispatch(&self, dataset: Dataset, result: &Result<SyncReport, SyncError>) {
        let event = match result {
            Ok(report) => {
                if let Some(listener) = &self.listener {
                    listener.on_sync(report);
                }
                SyncEvent::Completed(report.clone())
            }
            Err(error) => {
                tracing::error!(%dataset, status = ?error.status(), %error, "sync failed");
                if let Some(listener) = &self.listener {
                    listener.on_error(dataset, error);
                }
                SyncEvent::Failed {
                    dataset,
                    error: error.to_string(),
                }
            }
        };
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Start watching connectivity.
    ///
    /// Syncs immediately when online, then again on every offline to online
    /// transition. The task runs until aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut rx = self.connectivity.subscribe();
            let mut online = *rx.borrow_and_update();
            if online {
                self.trigger();
            }
            while rx.changed().await.is_ok() {
                let now = *rx.borrow_and_update();
                if now && !online {
                    tracing::debug!("back online, syncing");
                    self.trigger();
                }
                online = now;
            }
        })
    }

    fn trigger(self: &Arc<Self>) {
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            runner.run_once().await;
        });
    }
}
