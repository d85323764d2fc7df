//! Application configuration management.
//!
//! This module handles loading and saving the client configuration:
//! the API base URL, the login path used for forced redirects, and the
//! request timeout.
//!
//! Configuration is stored at `~/.config/navegaja-admin/config.json`;
//! the `NAVEGAJA_API_URL` environment variable overrides the base URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/state directory paths
const APP_NAME: &str = "navegaja-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default API base URL
const DEFAULT_API_BASE_URL: &str = "https://api.navegaja.com";

/// Default path the client redirects to on unrecoverable auth failure
const DEFAULT_LOGIN_PATH: &str = "/login";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the API base URL
const API_URL_ENV: &str = "NAVEGAJA_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub login_path: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.api_base_url = url;
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for persisted auth state (used by `DiskStorage`).
    pub fn state_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api_base_url":"http://localhost:3000"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
