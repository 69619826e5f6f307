use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use planit_config::PlanitConfig;
use planit_db::PlanitDb;
use planit_state::LocalStateProvider;
use planit_sync::{HttpFetcher, SyncContext};

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: PlanitConfig,
    pub sync: SyncContext,
    pub provider: LocalStateProvider,
}

impl AppContext {
    /// Open the store and wire the sync context and provider over it.
    pub async fn init(config: PlanitConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = flags
            .db
            .as_ref()
            .map_or_else(|| config.store.resolved_path(), PathBuf::from);
        ensure_parent_dir(&db_path).await?;

        let db_path_str = db_path.to_string_lossy();
        let store = PlanitDb::open_local(&db_path_str)
            .await
            .with_context(|| format!("failed to open store at {}", db_path.display()))?;
        tracing::debug!(path = %db_path.display(), "store opened");

        let fetcher =
            HttpFetcher::new(&config.remote).context("failed to build the HTTP client")?;
        let sync = SyncContext::from_config(Arc::new(store), Arc::new(fetcher), &config);
        if flags.offline {
            sync.connectivity.set_online(false);
        }

        let provider = LocalStateProvider::new(sync.clone());

        Ok(Self {
            config,
            sync,
            provider,
        })
    }
}

async fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display())),
        _ => Ok(()),
    }
}
