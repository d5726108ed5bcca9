//! Shared error definitions for instruction primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the instruction crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating instruction primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided instruction identifier could not be parsed.
    #[error("invalid instruction id: {source}")]
    InvalidInstructionId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },
}
