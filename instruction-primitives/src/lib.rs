//! Core shared types for prompt instruction records.
//!
//! An [`Instruction`] is a named prompt template whose text must carry the
//! `{web_results}` and `{query}` placeholders before it can be persisted. The
//! built-in default record is synthesized by [`default_instruction`] and is
//! never stored alongside user records.

#![warn(missing_docs, clippy::pedantic)]

mod defaults;
mod error;
mod ids;
mod instruction;
mod template;
mod validation;

/// Built-in default instruction and its reserved name.
pub use defaults::{DEFAULT_INSTRUCTION_NAME, DEFAULT_INSTRUCTION_TEXT, default_instruction};
/// Error type and result alias shared across the instruction crates.
pub use error::{Error, Result};
/// Identifier types distinguishing drafts, the default and persisted records.
pub use ids::{InstructionId, InstructionIdentity};
/// Named prompt template record.
pub use instruction::Instruction;
/// Placeholder tokens, insertion and rendering helpers.
pub use template::{Placeholder, PlaceholderStatus, PlaceholderValues, insert_placeholder};
/// Pure validation predicate shared by the store and its callers.
pub use validation::{ValidationReport, validate};
