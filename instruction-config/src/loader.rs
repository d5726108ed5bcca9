//! Configuration loader: defaults, optional JSON file, environment.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::schema::StoreConfig;
use crate::{ConfigError, ConfigResult};

/// Overrides [`StoreConfig::data_dir`].
pub const ENV_DATA_DIR: &str = "INSTRUCTIONS_DATA_DIR";
/// Overrides [`StoreConfig::collection_key`].
pub const ENV_COLLECTION_KEY: &str = "INSTRUCTIONS_COLLECTION_KEY";
/// Overrides [`StoreConfig::log_filter`].
pub const ENV_LOG_FILTER: &str = "INSTRUCTIONS_LOG";

/// Builds a [`StoreConfig`] from its layered sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    read_env: bool,
}

impl ConfigLoader {
    /// Creates a loader that reads only built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the supplied JSON file when it exists.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Applies `INSTRUCTIONS_*` environment overrides.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.read_env = true;
        self
    }

    /// Resolves and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or when
    /// the resolved values fail validation.
    pub fn load(&self) -> ConfigResult<StoreConfig> {
        self.load_with(|name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load), reading environment values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with<F>(&self, lookup: F) -> ConfigResult<StoreConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.file {
            Some(path) => read_file(path)?.unwrap_or_default(),
            None => StoreConfig::default(),
        };

        if self.read_env {
            if let Some(dir) = lookup(ENV_DATA_DIR) {
                config.data_dir = Some(PathBuf::from(dir));
            }
            if let Some(key) = lookup(ENV_COLLECTION_KEY) {
                config.collection_key = key;
            }
            if let Some(filter) = lookup(ENV_LOG_FILTER) {
                config.log_filter = filter;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn read_file(path: &Path) -> ConfigResult<Option<StoreConfig>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(Some(serde_json::from_str(&raw)?))
}
