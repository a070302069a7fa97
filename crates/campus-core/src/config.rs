//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the API
//! base URL, where the session record is persisted, the guard's redirect
//! targets, and the last email used to log in.
//!
//! Configuration is stored at `~/.config/campus/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::auth::{FileStorage, KeyringStorage, SessionStorage};
use crate::guard::{DEFAULT_LANDING_ROUTE, DEFAULT_LOGIN_ROUTE};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "campus";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the cache dir holding the file-backed session record
const SESSION_DIR: &str = "session";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Where the persisted session record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub storage: StorageBackend,
    pub session_dir: Option<PathBuf>,
    /// No timeout when unset.
    pub request_timeout_secs: Option<u64>,
    pub login_route: String,
    pub landing_route: String,
    pub last_email: Option<String>,
    pub log_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage: StorageBackend::default(),
            session_dir: None,
            request_timeout_secs: None,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            landing_route: DEFAULT_LANDING_ROUTE.to_string(),
            last_email: None,
            log_file: false,
        }
    }
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

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn session_dir(&self) -> Result<PathBuf> {
        match self.session_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Ok(self.cache_dir()?.join(SESSION_DIR)),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Build the configured session storage backend.
    pub fn session_storage(&self) -> Result<Box<dyn SessionStorage>> {
        Ok(match self.storage {
            StorageBackend::File => Box::new(FileStorage::new(self.session_dir()?)),
            StorageBackend::Keyring => Box::new(KeyringStorage::new()),
        })
    }

    /// Apply `CAMPUS_API_URL` from the environment, if set.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CAMPUS_API_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
    }
}
