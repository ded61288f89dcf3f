//! Process configuration sourced from the environment.
//!
//! # Responsibility
//! - Resolve the store location and logging settings at startup.
//!
//! # Invariants
//! - The store location has no built-in fallback; it must be supplied.
//! - Lookups go through a caller-supplied function so tests never touch the
//!   real process environment.

use crate::logging::{default_log_level, normalize_level};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TASKTRAQ_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "TASKTRAQ_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKTRAQ_LOG_DIR";

/// Configuration loading error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is unset or blank.
    MissingVar(&'static str),
    /// Variable is set but unusable.
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "required environment variable {key} is not set"),
            Self::InvalidValue { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings needed to open the store and start logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file backing the tracker store.
    pub db_path: PathBuf,
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingVar(DB_PATH_VAR))?;

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level).map_err(|message| ConfigError::InvalidValue {
                key: LOG_LEVEL_VAR,
                message,
            })?,
            None => {
                info!(
                    "event=config_load module=config status=default key={LOG_LEVEL_VAR} value={}",
                    default_log_level()
                );
                default_log_level()
            }
        };

        let log_dir = match read(LOG_DIR_VAR).map(PathBuf::from) {
            Some(dir) if !dir.is_absolute() => {
                return Err(ConfigError::InvalidValue {
                    key: LOG_DIR_VAR,
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
            Some(dir) => Some(dir),
            None => {
                warn!("event=config_load module=config status=default key={LOG_DIR_VAR} file_logging=off");
                None
            }
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}
