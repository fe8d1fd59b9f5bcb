//! Persistent tracker preferences and their on-disk manager.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{core::utils::PathResolver, utils::persistence::write_atomic};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_DATABASE_FILE: &str = "finance_tracker.json";
const DEFAULT_HISTORY_LIMIT: usize = 10;
const DEFAULT_CURRENCY_SYMBOL: &str = "₽";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Stores user-configurable runtime preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `~/.finance_tracker`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_database_file")]
    pub database_file: String,
    #[serde(default = "Config::default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: Self::default_database_file(),
            history_limit: Self::default_history_limit(),
            currency_symbol: Self::default_currency_symbol(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_database_file() -> String {
        DEFAULT_DATABASE_FILE.into()
    }

    pub fn default_history_limit() -> usize {
        DEFAULT_HISTORY_LIMIT
    }

    pub fn default_currency_symbol() -> String {
        DEFAULT_CURRENCY_SYMBOL.into()
    }

    /// Directory holding the ledger file, honouring the configured override.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(PathResolver::base_dir)
    }

    /// Full path of the ledger file. `FINANCE_TRACKER_DB` wins over the config.
    pub fn resolve_database_path(&self) -> PathBuf {
        PathResolver::database_override()
            .unwrap_or_else(|| self.resolve_data_dir().join(&self.database_file))
    }
}

/// Handles loading and saving [`Config`] under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir)?;
        Ok(Self {
            path: config_dir.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
