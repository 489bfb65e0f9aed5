//! Configuration for the local engine and the export run store
//!
//! Values come from the environment (optionally loaded from a `.env` file by
//! the binary) with defaults for everything.

use crate::engine::DEFAULT_QUEUE;
use crate::error::{ExportflowError, Result};
use crate::export::{ExportRunStore, InMemoryExportRunStore, JsonFileExportRunStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Queue named in the start options the local engine builds
pub const ENV_QUEUE: &str = "EXPORTFLOW_QUEUE";
/// Default start-to-close timeout for activities, in seconds
pub const ENV_ACTIVITY_TIMEOUT_SECS: &str = "EXPORTFLOW_ACTIVITY_TIMEOUT_SECS";
/// Path of the JSON run store; unset means in-memory
pub const ENV_STORE_PATH: &str = "EXPORTFLOW_STORE_PATH";

/// Configuration for [`LocalEngine`](crate::engine::LocalEngine)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Queue for options from [`LocalEngine::start_options`](crate::engine::LocalEngine::start_options)
    pub queue: String,
    /// Timeout for activities that declare none
    pub default_activity_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue: DEFAULT_QUEUE.to_string(),
            default_activity_timeout: Duration::from_secs(300),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with validation
    pub fn new(
        queue: impl Into<String>,
        default_activity_timeout: Duration,
    ) -> std::result::Result<Self, ConfigError> {
        let queue = queue.into();
        if queue.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "queue must not be empty".to_string(),
            ));
        }
        if default_activity_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "default_activity_timeout must be positive".to_string(),
            ));
        }

        Ok(Self {
            queue,
            default_activity_timeout,
        })
    }

    /// Read the configuration from process environment variables
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults for
    /// unset keys
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let queue = lookup(ENV_QUEUE).unwrap_or(defaults.queue);
        let timeout = match lookup(ENV_ACTIVITY_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "{ENV_ACTIVITY_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.default_activity_timeout,
        };

        Self::new(queue, timeout)
    }
}

/// Where export runs are persisted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreConfig {
    /// Process-local; runs are lost on exit
    #[default]
    Memory,
    /// JSON file at the given path
    File(PathBuf),
}

impl StoreConfig {
    /// Read the store location from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_STORE_PATH) {
            Some(path) if !path.trim().is_empty() => StoreConfig::File(PathBuf::from(path)),
            _ => StoreConfig::Memory,
        }
    }

    /// Open the configured store
    pub fn open(&self) -> Result<Arc<dyn ExportRunStore>> {
        Ok(match self {
            StoreConfig::Memory => Arc::new(InMemoryExportRunStore::new()),
            StoreConfig::File(path) => Arc::new(JsonFileExportRunStore::open(path)?),
        })
    }
}

/// Configuration error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<ConfigError> for ExportflowError {
    fn from(err: ConfigError) -> Self {
        ExportflowError::InvalidConfiguration(err.to_string())
    }
}
