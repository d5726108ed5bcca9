//! Caller-side editing state for a single selected instruction.
//!
//! An [`EditSession`] holds the working copy an editor mutates, recomputes
//! validation on every change and decides when a save may reach the store.
//! Errors are surfaced only after a save attempt on an invalid draft.

use std::ops::Range;

use instruction_primitives::{
    Instruction, Placeholder, PlaceholderStatus, ValidationReport, insert_placeholder,
};
use serde::Serialize;
use tracing::debug;

use crate::store::InstructionStore;
use crate::{StoreError, StoreResult};

/// Where the session is in its edit cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    /// Freshly selected or created; no errors surfaced.
    #[default]
    Clean,
    /// A field has been touched since selection.
    Editing,
    /// A save was attempted while the working copy was invalid.
    ErrorsShown,
}

/// Two-step delete confirmation: the first request arms, the second commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteConfirmation {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A first delete request is awaiting confirmation.
    Armed,
}

/// Result of [`EditSession::save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The working copy was persisted; it now carries its stored identity.
    Saved(Instruction),
    /// The working copy is invalid; errors are now shown.
    Blocked(ValidationReport),
}

/// Result of [`EditSession::delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// First request: confirmation is now armed.
    Armed,
    /// Second request: the record was removed (or was already absent) and
    /// the session moved to a fresh draft.
    Deleted,
}

/// Working copy of one instruction plus its transient editor state.
#[derive(Clone, Debug)]
pub struct EditSession {
    instruction: Instruction,
    state: EditState,
    report: ValidationReport,
    delete: DeleteConfirmation,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new_draft()
    }
}

impl EditSession {
    /// Starts a session on an existing record (or the default).
    #[must_use]
    pub fn select(instruction: Instruction) -> Self {
        let report = instruction.validate();
        Self {
            instruction,
            state: EditState::Clean,
            report,
            delete: DeleteConfirmation::Idle,
        }
    }

    /// Starts a session on an empty draft.
    #[must_use]
    pub fn new_draft() -> Self {
        Self::select(Instruction::blank())
    }

    /// Switches to another record, clearing surfaced errors.
    pub fn reselect(&mut self, instruction: Instruction) {
        *self = Self::select(instruction);
    }

    /// Returns the working copy.
    #[must_use]
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// Returns the current edit state.
    #[must_use]
    pub const fn state(&self) -> EditState {
        self.state
    }

    /// Returns the delete confirmation state.
    #[must_use]
    pub const fn delete_confirmation(&self) -> DeleteConfirmation {
        self.delete
    }

    /// Returns the validation flags for the current working copy.
    #[must_use]
    pub const fn report(&self) -> ValidationReport {
        self.report
    }

    /// Returns the flags an editor should display, which is nothing until a
    /// save has been attempted on an invalid working copy.
    #[must_use]
    pub fn visible_errors(&self) -> Option<ValidationReport> {
        (self.state == EditState::ErrorsShown && !self.report.is_save_eligible())
            .then_some(self.report)
    }

    /// Returns which placeholders the working text contains.
    #[must_use]
    pub fn placeholders(&self) -> PlaceholderStatus {
        self.instruction.placeholders()
    }

    /// Returns `true` when the working copy is the built-in default, which
    /// cannot be renamed, edited, saved or deleted.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.instruction.is_default()
    }

    /// Replaces the working name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedInstruction`] on the default.
    pub fn set_name(&mut self, name: impl Into<String>) -> StoreResult<()> {
        self.ensure_editable()?;
        self.instruction.set_name(name);
        self.touched();
        Ok(())
    }

    /// Replaces the working text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedInstruction`] on the default.
    pub fn set_text(&mut self, text: impl Into<String>) -> StoreResult<()> {
        self.ensure_editable()?;
        self.instruction.set_text(text);
        self.touched();
        Ok(())
    }

    /// Inserts a placeholder over `selection` in the working text and
    /// returns the cursor position after the inserted token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedInstruction`] on the default.
    pub fn insert_placeholder(
        &mut self,
        placeholder: Placeholder,
        selection: Range<usize>,
    ) -> StoreResult<usize> {
        self.ensure_editable()?;
        let (text, cursor) = insert_placeholder(self.instruction.text(), placeholder, selection);
        self.instruction.set_text(text);
        self.touched();
        Ok(cursor)
    }

    /// Attempts to save the working copy.
    ///
    /// An invalid working copy never reaches the store; the session moves to
    /// [`EditState::ErrorsShown`] instead. A successful save adopts the
    /// stored record, so a saved draft is updated in place next time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedInstruction`] on the default and any
    /// error reported by the store.
    pub async fn save(&mut self, store: &InstructionStore) -> StoreResult<SaveOutcome> {
        self.ensure_editable()?;
        if !self.report.is_save_eligible() {
            self.state = EditState::ErrorsShown;
            debug!(report = %self.report, "save blocked by validation");
            return Ok(SaveOutcome::Blocked(self.report));
        }

        let saved = store.save_instruction(&self.instruction).await?;
        self.reselect(saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    /// Requests deletion of the working copy.
    ///
    /// The first call arms the confirmation; the second removes the record
    /// and moves the session to a fresh draft.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedInstruction`] on the default and storage
    /// errors from the store; the confirmation stays armed on failure.
    pub async fn delete(&mut self, store: &InstructionStore) -> StoreResult<DeleteOutcome> {
        self.ensure_editable()?;
        match self.delete {
            DeleteConfirmation::Idle => {
                self.delete = DeleteConfirmation::Armed;
                Ok(DeleteOutcome::Armed)
            }
            DeleteConfirmation::Armed => {
                store.delete_instruction(&self.instruction).await?;
                *self = Self::new_draft();
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    fn ensure_editable(&self) -> StoreResult<()> {
        if self.is_locked() {
            return Err(StoreError::ReservedInstruction);
        }
        Ok(())
    }

    fn touched(&mut self) {
        self.report = self.instruction.validate();
        if self.state == EditState::Clean {
            self.state = EditState::Editing;
        }
    }
}
