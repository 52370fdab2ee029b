//! Global configuration loaded from `~/.config/brewres/config.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_index_base_url() -> String {
    "https://pypi.org".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Tool configuration. Every field has a default, so a missing or partial
/// config file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewresConfig {
    /// Base URL of the PyPI-compatible index whose project pages get scraped.
    #[serde(default = "default_index_base_url")]
    pub index_base_url: String,
    /// HTTP connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BrewresConfig {
    fn default() -> Self {
        Self {
            index_base_url: default_index_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("brewres")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BrewresConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BrewresConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BrewresConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = BrewresConfig::default();
        assert_eq!(cfg.index_base_url, "https://pypi.org");
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = BrewresConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: BrewresConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.index_base_url, cfg.index_base_url);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"index_base_url = "https://test.pypi.org""#;
        let cfg: BrewresConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.index_base_url, "https://test.pypi.org");
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn config_toml_empty_is_all_defaults() {
        let cfg: BrewresConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.index_base_url, "https://pypi.org");
    }
}
