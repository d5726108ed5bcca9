//! Configuration management for the instruction store.
//!
//! Values are resolved in three layers: built-in defaults, an optional JSON
//! file, then `INSTRUCTIONS_*` environment variables.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, ENV_COLLECTION_KEY, ENV_DATA_DIR, ENV_LOG_FILTER};
pub use schema::StoreConfig;

use thiserror::Error;

/// Errors surfaced while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was being read.
        path: std::path::PathBuf,
        /// Source [`std::io::Error`].
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`StoreConfig`].
    #[error("failed to parse config: {source}")]
    Parse {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },
    /// No platform data directory could be determined.
    #[error("no data directory available; set {}", loader::ENV_DATA_DIR)]
    NoDataDir,
    /// A resolved value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
