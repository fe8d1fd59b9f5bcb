use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".finance_tracker";
const HOME_ENV: &str = "FINANCE_TRACKER_HOME";
const DATABASE_ENV: &str = "FINANCE_TRACKER_DB";

/// Resolves the on-disk locations used by the tracker.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.finance_tracker`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// Explicit ledger file location taken from the environment, if any.
    pub fn database_override() -> Option<PathBuf> {
        env::var_os(DATABASE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}
