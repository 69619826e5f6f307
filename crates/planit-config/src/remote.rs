//! Remote data source configuration.

use serde::{Deserialize, Serialize};

fn default_data_base_url() -> String {
    "https://raw.githubusercontent.com/selfint/degree-planner/main/static".into()
}

fn default_commits_api_url() -> String {
    "https://api.github.com/repos/selfint/degree-planner/commits".into()
}

fn default_data_path_prefix() -> String {
    "static".into()
}

fn default_user_agent() -> String {
    concat!("planit/", env!("CARGO_PKG_VERSION")).into()
}

/// Default HTTP timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Base URL the published data files live under.
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Commit history endpoint used as a freshness probe.
    #[serde(default = "default_commits_api_url")]
    pub commits_api_url: String,

    /// Repository path of `data_base_url`, used in the probe's `path` query.
    #[serde(default = "default_data_path_prefix")]
    pub data_path_prefix: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            data_base_url: default_data_base_url(),
            commits_api_url: default_commits_api_url(),
            data_path_prefix: default_data_path_prefix(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// URL of a data file relative to the base URL.
    #[must_use]
    pub fn data_url(&self, relative: &str) -> String {
        format!("{}/{relative}", self.data_base_url.trim_end_matches('/'))
    }

    /// Repository path of a data file, for the freshness probe.
    #[must_use]
    pub fn repo_path(&self, relative: &str) -> String {
        let prefix = self.data_path_prefix.trim_matches('/');
        if prefix.is_empty() {
            relative.to_string()
        } else {
            format!("{prefix}/{relative}")
        }
    }
}
