//! Configuration management for Sortie.
//!
//! Configuration is owned by the outer layer (CLI, services) and handed to
//! the engine as plain values. The engine crates never read it themselves.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use sortie_scheduler::DEFAULT_TOP_K;

const DEFAULT_SNAPSHOT_PATH: &str = "fleet.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum suggestions per conflict
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Missions ending before this date are skipped by detection.
    /// Written as a quoted `"YYYY-MM-DD"` string.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot holding pilots, drones and missions
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
}

fn default_level() -> String {
    crate::logging::DEFAULT_LEVEL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            as_of: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: default_level(),
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.engine.top_k == 0 {
            return Err(Error::InvalidConfig(
                "engine.top_k must be at least 1".to_string(),
            ));
        }
        if self.store.snapshot_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "store.snapshot_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
