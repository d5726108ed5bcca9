//! Persistence and editing for prompt instructions.
//!
//! [`InstructionStore`] keeps the user's instructions as one serialized
//! collection inside a [`StorageBackend`]. Reads never validate; writes run
//! the shared validation predicate and are serialized per store instance.
//! The built-in default is synthesized and never written.

#![warn(missing_docs, clippy::pedantic)]

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod session;
pub mod store;

pub use backend::StorageBackend;
pub use error::{StoreError, StoreResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use session::{DeleteConfirmation, DeleteOutcome, EditSession, EditState, SaveOutcome};
pub use store::{DEFAULT_COLLECTION_KEY, InstructionStore};
