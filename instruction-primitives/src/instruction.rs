//! Named prompt template records.

use serde::{Deserialize, Serialize};

use crate::template::{PlaceholderStatus, PlaceholderValues, render_placeholders};
use crate::validation::{ValidationReport, validate};
use crate::{InstructionId, InstructionIdentity};

/// A named prompt template consumed by the search assistant.
///
/// Instructions are plain values: constructing or editing one never fails,
/// so a draft may be structurally invalid until it is saved. Use
/// [`Instruction::validate`] to check save-eligibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(default)]
    identity: InstructionIdentity,
    name: String,
    text: String,
}

impl Instruction {
    /// Creates an unsaved draft with the supplied name and text.
    #[must_use]
    pub fn draft(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identity: InstructionIdentity::Draft,
            name: name.into(),
            text: text.into(),
        }
    }

    /// Creates an empty draft, as offered by "add new instruction".
    #[must_use]
    pub fn blank() -> Self {
        Self::draft(String::new(), String::new())
    }

    /// Reconstructs a persisted record.
    #[must_use]
    pub fn persisted(id: InstructionId, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identity: InstructionIdentity::Persisted(id),
            name: name.into(),
            text: text.into(),
        }
    }

    pub(crate) fn built_in(name: &str, text: &str) -> Self {
        Self {
            identity: InstructionIdentity::Default,
            name: name.to_owned(),
            text: text.to_owned(),
        }
    }

    /// Returns the identity of this record.
    #[must_use]
    pub const fn identity(&self) -> InstructionIdentity {
        self.identity
    }

    /// Returns the persisted identifier, if the record has been saved.
    #[must_use]
    pub const fn id(&self) -> Option<InstructionId> {
        self.identity.id()
    }

    /// Returns `true` for the built-in default instruction.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.identity.is_default()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the template body.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns a copy of this record carrying a persisted identity.
    #[must_use]
    pub fn with_id(mut self, id: InstructionId) -> Self {
        self.identity = InstructionIdentity::Persisted(id);
        self
    }

    /// Returns `true` when both values refer to the same record.
    ///
    /// Persisted records compare by id and the default matches only the
    /// default. Drafts have no identity of their own and never match.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self.identity, other.identity) {
            (InstructionIdentity::Persisted(a), InstructionIdentity::Persisted(b)) => a == b,
            (InstructionIdentity::Default, InstructionIdentity::Default) => true,
            _ => false,
        }
    }

    /// Runs the validation predicate against this record.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validate(self)
    }

    /// Reports which placeholder tokens the text currently contains.
    #[must_use]
    pub fn placeholders(&self) -> PlaceholderStatus {
        PlaceholderStatus::scan(&self.text)
    }

    /// Substitutes placeholder tokens in the text with the supplied values.
    #[must_use]
    pub fn render(&self, values: &PlaceholderValues) -> String {
        render_placeholders(&self.text, values)
    }
}
