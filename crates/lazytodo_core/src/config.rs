//! Runtime configuration shared by adapters.
//!
//! Values resolve in order: explicit override, environment variable, default.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "LAZYTODO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "LAZYTODO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "LAZYTODO_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "lazytodo.sqlite3";

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` leaves logging disabled.
    pub log_dir: Option<PathBuf>,
}

/// Caller-provided values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves against an arbitrary variable lookup.
    pub fn resolve_with(overrides: ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| {
            env(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = overrides
            .db_path
            .or_else(|| lookup(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(default_db_path);
        let log_level = overrides
            .log_level
            .or_else(|| lookup(LOG_LEVEL_ENV))
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = overrides
            .log_dir
            .or_else(|| lookup(LOG_DIR_ENV).map(PathBuf::from));

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}

/// Database file under the OS temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
