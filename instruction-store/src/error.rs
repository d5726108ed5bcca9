//! Error types for the instruction store.

use instruction_primitives::ValidationReport;
use thiserror::Error;

/// Errors emitted by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The instruction failed the validation predicate.
    #[error("instruction is not save-eligible ({0})")]
    Validation(ValidationReport),
    /// The operation targeted the built-in default or its reserved name.
    #[error("the built-in default instruction cannot be modified")]
    ReservedInstruction,
    /// The persistence layer could not be read or written.
    #[error("instruction storage unavailable: {reason}")]
    StorageUnavailable {
        /// Human-readable reason describing the failure.
        reason: String,
    },
    /// The persisted collection could not be decoded or encoded.
    #[error("instruction collection is corrupted: {source}")]
    Corrupted {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },
    /// The collection key cannot be used by the backend.
    #[error("invalid collection key `{key}`: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl StoreError {
    /// Helper to construct storage failures from string-like values.
    #[must_use]
    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns `true` when the failure came from the persistence layer.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. } | Self::Corrupted { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(source: std::io::Error) -> Self {
        Self::storage_unavailable(source.to_string())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
