use std::sync::PoisonError;

use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Unified error type for the storage, service, and routing layers.
///
/// Validation failures (amounts, categories, export periods) have their own
/// types and are turned into user-facing messages before they reach here.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        TrackerError::Csv(err.to_string())
    }
}

impl From<ConfigError> for TrackerError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => TrackerError::Storage(io.to_string()),
            ConfigError::Serde(message) => TrackerError::Config(message),
        }
    }
}

impl<T> From<PoisonError<T>> for TrackerError {
    fn from(_: PoisonError<T>) -> Self {
        TrackerError::Storage("shared state lock poisoned".into())
    }
}
