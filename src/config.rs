//! Application configuration
//!
//! Read from `<config_dir>/ww2-archive/config.json`; a missing file means
//! defaults. `WW2_ARCHIVE_API` overrides the backend address.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::DEFAULT_MIN_WIDTH;

const APP_DIR: &str = "ww2-archive";
const CONFIG_FILE: &str = "config.json";
const API_ENV: &str = "WW2_ARCHIVE_API";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend origin, without the `/api` suffix
    pub api_base: String,
    pub search_limit: u32,
    pub video_limit: u32,
    pub category_limit: u32,
    pub category_video_limit: u32,
    pub search_all_limit: u32,
    pub history_limit: u32,
    pub min_width: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            search_limit: 50,
            video_limit: 30,
            category_limit: 100,
            category_video_limit: 20,
            search_all_limit: 100,
            history_limit: 20,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the user config and apply environment overrides.
    ///
    /// A broken file is logged and replaced by defaults so the app still starts.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("{} (using defaults)", e);
                Self::default()
            }),
            None => Self::default(),
        };
        config.apply_override(std::env::var(API_ENV).ok());
        config
    }

    fn apply_override(&mut self, api_base: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            tracing::info!("Using backend from {}: {}", API_ENV, base);
            self.api_base = base.trim().to_string();
        }
    }
}
