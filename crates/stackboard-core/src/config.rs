//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, request timeout and last used username.
//!
//! Configuration is stored at `~/.config/stackboard/config.json`. The
//! `STACKBOARD_API_BASE_URL` environment variable overrides the base URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "stackboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured API base URL
pub const API_BASE_URL_ENV: &str = "STACKBOARD_API_BASE_URL";

/// Product API used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_username: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub session_expires_in_mins: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
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

    /// Directory holding the persisted session storage
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Base URL from the environment, then the config file, then the default.
    /// Trailing slashes are dropped.
    pub fn api_base_url(&self) -> String {
        let env_url = std::env::var(API_BASE_URL_ENV).ok();
        Self::resolve_base_url(env_url.as_deref(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(env_url: Option<&str>, configured: Option<&str>) -> String {
        env_url
            .filter(|u| !u.trim().is_empty())
            .or(configured.filter(|u| !u.trim().is_empty()))
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim()
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}
