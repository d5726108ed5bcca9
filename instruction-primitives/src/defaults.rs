//! The built-in default instruction.

use crate::Instruction;

/// Reserved display name of the built-in instruction.
///
/// User records may not be saved under this name.
pub const DEFAULT_INSTRUCTION_NAME: &str = "Default prompt";

/// Template body of the built-in instruction.
pub const DEFAULT_INSTRUCTION_TEXT: &str = "Web search results:

{web_results}
Current date: {current_date}

Instructions: Using the provided web search results, write a comprehensive reply to the given query. Make sure to cite results using [[number](URL)] notation after the reference. If the provided search results refer to multiple subjects with the same name, write separate answers for each subject.
Query: {query}";

/// Returns the built-in default instruction.
///
/// The value is rebuilt from constants on every call, so repeated calls
/// always compare equal and nothing can mutate the shared definition.
#[must_use]
pub fn default_instruction() -> Instruction {
    Instruction::built_in(DEFAULT_INSTRUCTION_NAME, DEFAULT_INSTRUCTION_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stable_across_calls() {
        let first = default_instruction();
        let second = default_instruction();
        assert_eq!(first, second);
        assert!(first.is_default());
        assert!(first.id().is_none());
        assert_eq!(first.name(), DEFAULT_INSTRUCTION_NAME);
    }

    #[test]
    fn default_is_save_eligible() {
        assert!(default_instruction().validate().is_save_eligible());
        assert!(default_instruction().placeholders().has_current_date);
    }
}
