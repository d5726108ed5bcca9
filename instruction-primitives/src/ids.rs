//! Instruction identifier types.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Opaque identifier assigned to an instruction the first time it is saved.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructionId(Uuid);

impl InstructionId {
    /// Generates a random instruction identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for InstructionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for InstructionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<InstructionId> for Uuid {
    fn from(value: InstructionId) -> Self {
        value.0
    }
}

impl FromStr for InstructionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(s).map_err(Error::from)?;
        Ok(Self::from_uuid(uuid))
    }
}

/// Identity of an instruction record.
///
/// Identity comparison is a structural match on this enum: two persisted
/// records are the same record iff their ids are equal, and the default is
/// always the default regardless of its content.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum InstructionIdentity {
    /// In-memory record that has never been saved.
    #[default]
    Draft,
    /// The built-in default instruction.
    Default,
    /// Record stored by the instruction store.
    Persisted(InstructionId),
}

impl InstructionIdentity {
    /// Returns the persisted identifier, if any.
    #[must_use]
    pub const fn id(self) -> Option<InstructionId> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Draft | Self::Default => None,
        }
    }

    /// Returns `true` for the built-in default identity.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}
