//! # planit-config
//!
//! Layered configuration loading for Planit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PLANIT_*` prefix, `__` as separator)
//! 2. Project-level `.planit/config.toml`
//! 3. User-level `~/.config/planit/config.toml`
//! 4. Built-in defaults
//!
//! `PLANIT_REMOTE__TIMEOUT_SECS` maps to `remote.timeout_secs`,
//! `PLANIT_SYNC__OFFLINE` to `sync.offline`, and so on.
//!
//! ```no_run
//! use planit_config::PlanitConfig;
//!
//! let config = PlanitConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.store.resolved_path().display());
//! ```

mod error;
mod general;
mod remote;
mod store;
mod sync;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use remote::RemoteConfig;
pub use store::StoreConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlanitConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PlanitConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] when a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading a `.env` file from the current
    /// directory, if one exists.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".planit/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PLANIT_").split("__"))
    }

    /// Reject values that would make every sync fail.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty data URL or a zero
    /// HTTP timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.data_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "remote.data_base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("planit").join("config.toml"))
    }
}
