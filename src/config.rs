//! Runtime configuration: backend origin, request timeout, storage location.
//!
//! Resolution order: built-in defaults, then `config.toml` in the platform
//! config directory, then environment variables (`CMPANEL_API_URL`,
//! `CMPANEL_TIMEOUT_SECS`, `CMPANEL_STORAGE_DIR`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Production origin of the CMPanel backend.
pub const DEFAULT_API_BASE_URL: &str = "https://llm-cm-agent-backend.onrender.com";

/// Per-request timeout applied by the HTTP client.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Qualifier/organization/application triple for the platform directories.
const APP_NAME: &str = "cmpanel";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin; request paths are joined onto it.
    pub api_base_url: String,
    /// Per-request timeout handed to the HTTP client, in seconds.
    pub request_timeout_secs: u64,
    /// Directory for persisted client state. `None` selects the platform
    /// data directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load the layered configuration.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::config_file_path() {
            if path.exists() {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                config = toml::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?;
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// `config.toml` under the platform config directory, if one resolves.
    fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay environment variables onto the current values.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CMPANEL_API_URL") {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(secs) = std::env::var("CMPANEL_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => tracing::warn!(value = %secs, "ignoring non-numeric CMPANEL_TIMEOUT_SECS"),
            }
        }
        if let Ok(dir) = std::env::var("CMPANEL_STORAGE_DIR") {
            if !dir.is_empty() {
                self.storage_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Directory to persist client state in: the configured override, else
    /// the platform data directory, else nothing (storage-less context).
    pub fn resolve_storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone().or_else(|| {
            directories::ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }
}
