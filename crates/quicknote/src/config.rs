//! Application configuration.
//!
//! Stored as a small JSON file. Every field has a default, so a missing file
//! or a partial one both load.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use quicknote_core::Error;
use serde::{Deserialize, Serialize};

/// Default quiet period before a search runs.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Private directory for attached images.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("quicknote.db")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            images_dir: default_images_dir(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl Config {
    /// Keep the database and images together under one data directory.
    pub fn with_data_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            database_path: dir.join("quicknote.db"),
            images_dir: dir.join("images"),
            ..Self::default()
        }
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
