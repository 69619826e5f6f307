//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use planit_config::PlanitConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
path = "./cache/planit.db"

[remote]
data_base_url = "https://mirror.example/static"
timeout_secs = 5

[sync]
offline = true
probe_freshness = false

[general]
default_page_size = 50
"#,
        )?;

        let config: PlanitConfig = Figment::from(Serialized::defaults(PlanitConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.path, "./cache/planit.db");
        assert_eq!(config.remote.data_base_url, "https://mirror.example/static");
        assert_eq!(config.remote.timeout_secs, 5);
        assert_eq!(
            config.remote.commits_api_url,
            "https://api.github.com/repos/selfint/degree-planner/commits"
        );
        assert!(config.sync.offline);
        assert!(!config.sync.probe_freshness);
        assert_eq!(config.general.default_page_size, 50);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[remote]\ntimeout_secs = 5\n")?;
        jail.set_env("PLANIT_REMOTE__TIMEOUT_SECS", "90");
        jail.set_env("PLANIT_SYNC__OFFLINE", "true");

        let config: PlanitConfig = Figment::from(Serialized::defaults(PlanitConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("PLANIT_").split("__"))
            .extract()?;

        assert_eq!(config.remote.timeout_secs, 90);
        assert!(config.sync.offline);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".planit")?;
        jail.create_file(".planit/config.toml", "[general]\ndefault_page_size = 7\n")?;

        let config = PlanitConfig::load().expect("config loads");
        assert_eq!(config.general.default_page_size, 7);
        Ok(())
    });
}

#[test]
fn load_rejects_invalid_values() {
    Jail::expect_with(|jail| {
        jail.set_env("PLANIT_REMOTE__TIMEOUT_SECS", "0");
        assert!(PlanitConfig::load().is_err());
        Ok(())
    });
}
