//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve log level, log directory and database path for hosts (CLI).
//!
//! # Invariants
//! - Values are validated with the same rules `init_logging` applies.
//! - Unset or blank variables fall back to defaults; they are never errors.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "DESCPROPS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DESCPROPS_LOG_DIR";
pub const ENV_DB_PATH: &str = "DESCPROPS_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { variable: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { variable, reason } => write!(f, "invalid {variable}: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// In-memory database when unset.
    pub db_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            db_path: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|reason| {
                ConfigError::InvalidValue {
                    variable: ENV_LOG_LEVEL,
                    reason,
                }
            })?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(|reason| {
                ConfigError::InvalidValue {
                    variable: ENV_LOG_DIR,
                    reason,
                }
            })?);
        }
        config.db_path = read(ENV_DB_PATH).map(|path| PathBuf::from(path.trim()));

        Ok(config)
    }
}
