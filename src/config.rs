//! Application configuration
//!
//! Read from `config.toml` in the user's config directory. Every field is
//! optional; a missing file gives the defaults.
//!
//! ```toml
//! dataDir = "/home/me/vocab"
//!
//! [anki]
//! newCardsPerDay = 15
//! maxReviewsPerDay = 200
//!
//! [session]
//! wordCount = 30
//!
//! [priority]
//! recency = 0.25
//! fairness = 0.05
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anki::AnkiConfig;
use crate::storage::FileStorage;
use crate::vocab::PriorityWeights;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Priority weights must be finite and non-negative")]
    InvalidWeights,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default = "default_word_count")]
    pub word_count: usize,
}

fn default_word_count() -> usize {
    20
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            word_count: default_word_count(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Overrides the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Limits given to newly created Anki decks
    #[serde(default)]
    pub anki: AnkiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub priority: PriorityWeights,
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("wordwise").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load the config at `path`, or the defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let w = &self.priority;
        let weights = [w.rank, w.failure, w.level, w.recency, w.quit, w.fairness];
        if weights.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidWeights);
        }
        Ok(())
    }

    /// Data directory: the configured one, else the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStorage::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }
}
