//! Prompt instruction management SDK facade.
//!
//! Depend on this crate to pull in the instruction primitives together with
//! the store, configuration and telemetry crates, each behind a feature flag.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use instruction_primitives as primitives;

/// Persistence and edit sessions (enabled by `store` feature).
#[cfg(feature = "store")]
pub use instruction_store as store;

/// Configuration loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use instruction_config as config;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use instruction_telemetry as telemetry;

/// Opens a file-backed store as described by `config`.
///
/// # Errors
///
/// Returns [`config::ConfigError::NoDataDir`] when no data directory can be
/// resolved.
#[cfg(all(feature = "store", feature = "config"))]
pub fn open_store(
    config: &config::StoreConfig,
) -> config::ConfigResult<store::InstructionStore> {
    let data_dir = config.resolve_data_dir()?;
    let backend = std::sync::Arc::new(store::FileBackend::new(data_dir));
    Ok(store::InstructionStore::new(backend).with_collection_key(config.collection_key.clone()))
}
