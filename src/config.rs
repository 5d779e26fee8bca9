//! Configuration for tasklist

use crate::filter::FilterMode;
use crate::slot::{FileSlot, MemorySlot, Slot, SqliteSlot};
use crate::store::STORAGE_KEY;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage backend for the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key under `store_path`
    #[default]
    File,
    /// SQLite database at `store_path/tasklist.db`
    Sqlite,
    /// Nothing is kept after the process exits
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the stored list
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    #[serde(default)]
    pub backend: Backend,

    /// Key the list is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Filter used by `ls` when none is given
    #[serde(default)]
    pub default_filter: FilterMode,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            backend: Backend::default(),
            storage_key: default_storage_key(),
            default_filter: FilterMode::default(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::from_file(config_path);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("tasklist").join("config.yml")),
            Some(PathBuf::from("tasklist.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Open the configured storage backend
    pub fn open_slot(&self) -> Result<Box<dyn Slot>> {
        let slot: Box<dyn Slot> = match self.backend {
            Backend::File => Box::new(FileSlot::open(&self.store_path)?),
            Backend::Sqlite => Box::new(SqliteSlot::open(self.store_path.join("tasklist.db"))?),
            Backend::Memory => Box::new(MemorySlot::new()),
        };
        Ok(slot)
    }
}
