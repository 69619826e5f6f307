//! Local store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DB_FILE_NAME: &str = "planit.db";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Database file path. Empty means the platform data directory.
    #[serde(default)]
    pub path: String,
}

impl StoreConfig {
    /// Resolved database path.
    ///
    /// Falls back to `<data_dir>/planit/planit.db`, or `./planit.db` when the
    /// platform has no data directory.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if !self.path.is_empty() {
            return PathBuf::from(&self.path);
        }
        dirs::data_dir().map_or_else(
            || PathBuf::from(DB_FILE_NAME),
            |dir| dir.join("planit").join(DB_FILE_NAME),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = StoreConfig {
            path: "/tmp/cache.db".into(),
        };
        assert_eq!(config.resolved_path(), PathBuf::from("/tmp/cache.db"));
    }

    #[test]
    fn default_path_ends_with_db_file() {
        let path = StoreConfig::default().resolved_path();
        assert!(path.ends_with(DB_FILE_NAME));
    }
}
