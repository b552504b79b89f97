//! User configuration, read from `config.toml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::Location;
use crate::db::data_dir;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Every field has a default, so an empty or missing file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site_title: String,
    /// Origin share links are built on.
    pub origin: String,
    pub path: String,
    /// Terminal columns below which the schedule switches to cards.
    pub mobile_breakpoint: u16,
    pub search_debounce_ms: u64,
    /// Live search waits for at least this many characters.
    pub search_min_chars: usize,
    pub notification_ms: u64,
    pub copy_feedback_ms: u64,
    /// Native share command; the link is appended as the last argument.
    pub share_command: Option<Vec<String>>,
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_title: "EazyChoir".to_string(),
            origin: "https://eazychoir.app".to_string(),
            path: "/".to_string(),
            mobile_breakpoint: 100,
            search_debounce_ms: 300,
            search_min_chars: 2,
            notification_ms: 3000,
            copy_feedback_ms: 2000,
            share_command: None,
            database: None,
        }
    }
}

impl Config {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Base location for share links.
    pub fn share_base(&self) -> Result<Location> {
        Location::from_parts(&self.origin, &self.path).context("invalid origin/path in config")
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}
