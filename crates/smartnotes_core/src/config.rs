//! Resolved runtime settings.
//!
//! # Invariants
//! - `log_level` is one of the normalized level names.
//! - `log_dir`, when set, is absolute.

use crate::logging::{
    default_log_level, init_logging, normalize_level, normalize_log_dir, LoggingError,
};
use crate::repo::item_repo::ItemRepository;
use crate::store::JsonFileStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Data file name used when none is configured, relative to the working
/// directory.
pub const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Debug)]
pub enum ConfigError {
    EmptyDataFile,
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataFile => write!(f, "data file path cannot be empty"),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyDataFile => None,
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Builds a config from optional overrides, validating each one.
    pub fn resolve(
        data_file: Option<PathBuf>,
        log_level: Option<&str>,
        log_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(data_file) = data_file {
            if data_file.as_os_str().is_empty() {
                return Err(ConfigError::EmptyDataFile);
            }
            config.data_file = data_file;
        }
        if let Some(level) = log_level {
            config.log_level = normalize_level(level)?;
        }
        if let Some(dir) = log_dir {
            config.log_dir = Some(normalize_log_dir(&dir)?);
        }
        Ok(config)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns whether logging was started.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        match &self.log_dir {
            Some(dir) => {
                init_logging(self.log_level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Opens the repository over the configured data file.
    pub fn open_repository(&self) -> ItemRepository<JsonFileStore> {
        ItemRepository::open(JsonFileStore::new(self.data_file.clone()))
    }
}
