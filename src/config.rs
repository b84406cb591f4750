use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::preset::FEEDBACK_DISPLAY_MS;
use crate::store::{JsonStore, StorageBackend};

pub const MAX_FEEDBACK_MS: u64 = 2_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default = "default_terminal_bell")]
    pub terminal_bell: bool,
}

fn default_data_dir() -> String {
    JsonStore::default_dir().to_string_lossy().to_string()
}
fn default_log_filter() -> String {
    "mathdrill=info".to_string()
}
fn default_feedback_ms() -> u64 {
    FEEDBACK_DISPLAY_MS
}
fn default_terminal_bell() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            data_dir: default_data_dir(),
            log_filter: default_log_filter(),
            feedback_ms: default_feedback_ms(),
            terminal_bell: default_terminal_bell(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdrill")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.feedback_ms = self.feedback_ms.min(MAX_FEEDBACK_MS);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = default_log_filter();
        }
    }
}
