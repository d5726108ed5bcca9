//! Observability utilities for instruction store hosts.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {source}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Source parse error.
        source: tracing_subscriber::filter::ParseError,
    },
    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

/// Result alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Builds the filter from `RUST_LOG`, falling back to `default_directive`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `RUST_LOG` is unset and
/// `default_directive` does not parse.
pub fn env_filter(default_directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default_directive).map_err(|source| TelemetryError::InvalidFilter {
            directive: default_directive.to_owned(),
            source,
        })
    })
}

/// Installs a compact `fmt` subscriber as the global default.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(default_directive: &str) -> TelemetryResult<()> {
    let filter = env_filter(default_directive)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_module_directives() {
        assert!(env_filter("instruction_store=debug,info").is_ok());
    }

    #[test]
    fn second_init_is_reported() {
        let first = init_tracing("warn");
        let second = init_tracing("warn");
        assert!(first.is_ok());
        assert!(matches!(second, Err(TelemetryError::AlreadyInitialised(_))));
    }
}
