//! Strongly typed configuration schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Collection key used when none is configured.
pub const DEFAULT_COLLECTION_KEY: &str = "instructions";

/// Log filter directive used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved settings for opening an instruction store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the persisted collection. `None` means the
    /// platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Key under which the collection is stored.
    pub collection_key: String,
    /// Tracing filter directive, in `RUST_LOG` syntax.
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            collection_key: DEFAULT_COLLECTION_KEY.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl StoreConfig {
    /// Checks that resolved values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty or path-like collection
    /// key, an empty log filter, or an empty data directory.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.collection_key.trim().is_empty() {
            return Err(ConfigError::Invalid("collection key must not be empty"));
        }
        if self.collection_key.contains(['/', '\\']) || self.collection_key.starts_with('.') {
            return Err(ConfigError::Invalid(
                "collection key must be a plain file stem",
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log filter must not be empty"));
        }
        if self
            .data_dir
            .as_deref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid("data directory must not be empty"));
        }
        Ok(())
    }

    /// Returns the configured data directory, falling back to the platform
    /// data directory for this application.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDataDir`] when no directory is configured and
    /// the platform offers none.
    pub fn resolve_data_dir(&self) -> ConfigResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        directories::ProjectDirs::from("", "", "instructions")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ConfigError::NoDataDir)
    }

    /// Returns the path of the collection document inside `data_dir`.
    #[must_use]
    pub fn collection_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.json", self.collection_key))
    }
}
