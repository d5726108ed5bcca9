//! Structural validation shared by the store and its callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Instruction;
use crate::template::Placeholder;

/// Outcome of validating an [`Instruction`].
///
/// Each flag is computed independently; no flag implies another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The name is empty or whitespace-only.
    pub name_error: bool,
    /// The text is empty or whitespace-only.
    pub text_error: bool,
    /// The text lacks the `{web_results}` token.
    pub missing_web_results_placeholder: bool,
    /// The text lacks the `{query}` token.
    pub missing_query_placeholder: bool,
}

impl ValidationReport {
    /// Returns `true` when every flag is clear.
    #[must_use]
    pub const fn is_save_eligible(&self) -> bool {
        !(self.name_error
            || self.text_error
            || self.missing_web_results_placeholder
            || self.missing_query_placeholder)
    }

    /// Lists the failing checks by field name.
    #[must_use]
    pub fn failures(&self) -> Vec<&'static str> {
        [
            (self.name_error, "name"),
            (self.text_error, "text"),
            (self.missing_web_results_placeholder, Placeholder::WebResults.token()),
            (self.missing_query_placeholder, Placeholder::Query.token()),
        ]
        .into_iter()
        .filter_map(|(failed, label)| failed.then_some(label))
        .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_save_eligible() {
            return f.write_str("valid");
        }
        write!(f, "failed checks: {}", self.failures().join(", "))
    }
}

/// Computes the validation flags for an instruction.
#[must_use]
pub fn validate(instruction: &Instruction) -> ValidationReport {
    let text = instruction.text();
    ValidationReport {
        name_error: instruction.name().trim().is_empty(),
        text_error: text.trim().is_empty(),
        missing_web_results_placeholder: !text.contains(Placeholder::WebResults.token()),
        missing_query_placeholder: !text.contains(Placeholder::Query.token()),
    }
}
