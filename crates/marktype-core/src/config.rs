//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[serde(default)]` on every section means a config file only needs the
//! keys it wants to change; everything else falls back to `Default`.
//!
//! ```toml
//! [storage]
//! key = "editorContent"
//!
//! [notifications]
//! duration_ms = 1500
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::notify::DEFAULT_DURATION;
use crate::storage::DEFAULT_KEY;

/// Main editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the document is persisted
    pub storage: StorageConfig,

    /// Transient popup settings
    pub notifications: NotificationConfig,

    /// Undo/redo settings
    pub history: HistoryConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses config from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("marktype").join("config.toml"))
    }

    /// Writes the config to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Directory the file store writes into.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.directory {
            Some(dir) => Ok(dir.clone()),
            None => {
                let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
                Ok(data_dir.join("marktype"))
            }
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage directory (platform data dir when unset)
    pub directory: Option<PathBuf>,

    /// Key the document is saved under
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

/// Notification popup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a popup stays visible
    pub duration_ms: u64,
}

impl NotificationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION.as_millis() as u64,
        }
    }
}

/// Undo history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Undo history limit
    pub undo_limit: usize,

    /// Typing within this window merges into one undo step
    pub coalesce_ms: u64,
}

impl HistoryConfig {
    pub fn coalesce_threshold(&self) -> Duration {
        Duration::from_millis(self.coalesce_ms)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_limit: 1000,
            coalesce_ms: 300,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
