//! Sync behaviour configuration.

use serde::{Deserialize, Serialize};

const fn default_probe_freshness() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Treat the network as unavailable. Every sync ends as `offline`.
    #[serde(default)]
    pub offline: bool,

    /// Query the commit history endpoint before downloading a dataset.
    #[serde(default = "default_probe_freshness")]
    pub probe_freshness: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            offline: false,
            probe_freshness: default_probe_freshness(),
        }
    }
}
