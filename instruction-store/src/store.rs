//! The instruction store: persisted records plus the built-in default.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use instruction_primitives::{
    DEFAULT_INSTRUCTION_NAME, Instruction, InstructionId, InstructionIdentity, default_instruction,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::StorageBackend;
use crate::{StoreError, StoreResult};

/// Key under which the collection is stored unless configured otherwise.
pub const DEFAULT_COLLECTION_KEY: &str = "instructions";

/// On-disk shape of a persisted instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredInstruction {
    uuid: InstructionId,
    name: String,
    text: String,
}

impl StoredInstruction {
    fn matches(&self, identity: InstructionIdentity, name: &str) -> bool {
        match identity {
            InstructionIdentity::Persisted(id) => self.uuid == id,
            InstructionIdentity::Draft => self.name == name,
            InstructionIdentity::Default => false,
        }
    }
}

impl From<StoredInstruction> for Instruction {
    fn from(value: StoredInstruction) -> Self {
        Instruction::persisted(value.uuid, value.name, value.text)
    }
}

/// Single source of truth for user instructions and the built-in default.
///
/// Mutations hold an internal lock across their read-modify-write cycle, so
/// at most one save or delete is in flight per store; further mutations
/// queue behind it. Reads take no lock.
pub struct InstructionStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    mutation: Mutex<()>,
}

impl fmt::Debug for InstructionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl InstructionStore {
    /// Creates a store over `backend` using [`DEFAULT_COLLECTION_KEY`].
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            key: DEFAULT_COLLECTION_KEY.to_owned(),
            mutation: Mutex::new(()),
        }
    }

    /// Overrides the key holding the serialized collection.
    #[must_use]
    pub fn with_collection_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Returns the collection key.
    #[must_use]
    pub fn collection_key(&self) -> &str {
        &self.key
    }

    /// Returns the built-in default instruction.
    #[must_use]
    pub fn default_instruction(&self) -> Instruction {
        default_instruction()
    }

    /// Returns every persisted instruction in insertion order.
    ///
    /// The default is not included. Records are returned as stored, even if
    /// they would no longer pass validation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageUnavailable`] when the backend cannot be
    /// read and [`StoreError::Corrupted`] when the collection cannot be decoded.
    pub async fn saved_instructions(&self) -> StoreResult<Vec<Instruction>> {
        let records = self.load().await?;
        Ok(records.into_iter().map(Instruction::from).collect())
    }

    /// Returns the default followed by every persisted instruction.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`saved_instructions`](Self::saved_instructions).
    pub async fn list_with_default(&self) -> StoreResult<Vec<Instruction>> {
        let saved = self.saved_instructions().await?;
        let mut all = Vec::with_capacity(saved.len() + 1);
        all.push(default_instruction());
        all.extend(saved);
        Ok(all)
    }

    /// Validates and persists an instruction, returning it as stored.
    ///
    /// Drafts receive a fresh identifier and are appended. A persisted record
    /// replaces the entry with the same id in place, or is appended when no
    /// such entry exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedInstruction`] for the default identity or
    /// the reserved default name, [`StoreError::Validation`] when the record
    /// is not save-eligible, and storage errors from the backend. On error
    /// the persisted collection is unchanged.
    pub async fn save_instruction(&self, instruction: &Instruction) -> StoreResult<Instruction> {
        if instruction.is_default() || instruction.name().trim() == DEFAULT_INSTRUCTION_NAME {
            return Err(StoreError::ReservedInstruction);
        }
        let report = instruction.validate();
        if !report.is_save_eligible() {
            debug!(%report, "rejected instruction save");
            return Err(StoreError::Validation(report));
        }

        let _guard = self.mutation.lock().await;
        let mut records = self.load().await?;

        let id = instruction.id().unwrap_or_else(InstructionId::random);
        let stored = StoredInstruction {
            uuid: id,
            name: instruction.name().to_owned(),
            text: instruction.text().to_owned(),
        };

        match records.iter_mut().find(|record| record.uuid == id) {
            Some(existing) => {
                *existing = stored;
                self.persist(&records).await?;
                info!(%id, "updated instruction");
            }
            None => {
                records.push(stored);
                self.persist(&records).await?;
                info!(%id, total = records.len(), "added instruction");
            }
        }

        Ok(instruction.clone().with_id(id))
    }

    /// Removes the persisted instruction matching `instruction`.
    ///
    /// Persisted records match by id; drafts match every stored record with
    /// the same name. Returns whether anything was removed. Missing records
    /// and the default are not errors.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the backend only.
    pub async fn delete_instruction(&self, instruction: &Instruction) -> StoreResult<bool> {
        let identity = instruction.identity();
        if identity.is_default() {
            return Ok(false);
        }

        let _guard = self.mutation.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|record| !record.matches(identity, instruction.name()));

        if records.len() == before {
            debug!(name = instruction.name(), "delete matched no instruction");
            return Ok(false);
        }

        self.persist(&records).await?;
        info!(
            removed = before - records.len(),
            total = records.len(),
            "deleted instruction"
        );
        Ok(true)
    }

    async fn load(&self) -> StoreResult<Vec<StoredInstruction>> {
        let data = match self.backend.read(&self.key).await {
            Ok(Some(data)) => data,
            Ok(None) => return Ok(Vec::new()),
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read instructions");
                return Err(err);
            }
        };
        if data.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    async fn persist(&self, records: &[StoredInstruction]) -> StoreResult<()> {
        let data = serde_json::to_vec(records)?;
        self.backend
            .write(&self.key, Bytes::from(data))
            .await
            .inspect_err(|err| {
                warn!(key = %self.key, error = %err, "failed to write instructions");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    fn store() -> (Arc<MemoryBackend>, InstructionStore) {
        let backend = Arc::new(MemoryBackend::new());
        let store = InstructionStore::new(backend.clone());
        (backend, store)
    }

    fn valid(name: &str) -> Instruction {
        Instruction::draft(name, "Results: {web_results}\nQuery: {query}")
    }

    #[tokio::test]
    async fn empty_backend_lists_nothing() {
        let (_, store) = store();
        assert!(store.saved_instructions().await.unwrap().is_empty());
        let all = store.list_with_default().await.unwrap();
        assert_eq!(all, vec![default_instruction()]);
    }

    #[tokio::test]
    async fn draft_save_assigns_id_and_appends() {
        let (_, store) = store();
        let first = store.save_instruction(&valid("first")).await.unwrap();
        let second = store.save_instruction(&valid("second")).await.unwrap();

        assert!(first.id().is_some());
        assert_ne!(first.id(), second.id());
        let saved = store.saved_instructions().await.unwrap();
        assert_eq!(saved, vec![first, second]);
    }

    #[tokio::test]
    async fn resave_replaces_in_place() {
        let (_, store) = store();
        let a = store.save_instruction(&valid("a")).await.unwrap();
        let b = store.save_instruction(&valid("b")).await.unwrap();
        let c = store.save_instruction(&valid("c")).await.unwrap();

        let mut edited = b.clone();
        edited.set_name("b2");
        edited.set_text("{query} then {web_results}");
        let returned = store.save_instruction(&edited).await.unwrap();
        assert_eq!(returned, edited);

        let saved = store.saved_instructions().await.unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[0], a);
        assert_eq!(saved[1].id(), b.id());
        assert_eq!(saved[1].name(), "b2");
        assert_eq!(saved[2], c);
    }

    #[tokio::test]
    async fn unknown_id_is_appended() {
        let (_, store) = store();
        let orphan = valid("orphan").with_id(InstructionId::random());
        let saved = store.save_instruction(&orphan).await.unwrap();
        assert_eq!(saved.id(), orphan.id());
        assert_eq!(store.saved_instructions().await.unwrap(), vec![orphan]);
    }

    #[tokio::test]
    async fn invalid_instruction_is_rejected_without_write() {
        let (backend, store) = store();
        let err = store
            .save_instruction(&Instruction::draft("A", "{web_results}"))
            .await
            .expect_err("missing query");
        match err {
            StoreError::Validation(report) => {
                assert!(report.missing_query_placeholder);
                assert!(!report.name_error);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn default_cannot_be_saved_or_shadowed() {
        let (_, store) = store();
        let err = store
            .save_instruction(&store.default_instruction())
            .await
            .expect_err("default is reserved");
        assert!(matches!(err, StoreError::ReservedInstruction));

        let err = store
            .save_instruction(&valid(DEFAULT_INSTRUCTION_NAME))
            .await
            .expect_err("name is reserved");
        assert!(matches!(err, StoreError::ReservedInstruction));
        assert!(store.saved_instructions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_by_id_and_absent_delete() {
        let (backend, store) = store();
        let a = store.save_instruction(&valid("a")).await.unwrap();
        let b = store.save_instruction(&valid("b")).await.unwrap();

        assert!(store.delete_instruction(&a).await.unwrap());
        assert_eq!(store.saved_instructions().await.unwrap(), vec![b.clone()]);

        let writes = backend.write_count();
        assert!(!store.delete_instruction(&a).await.unwrap());
        assert_eq!(backend.write_count(), writes);
        assert_eq!(store.saved_instructions().await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn draft_delete_matches_by_name() {
        let (_, store) = store();
        store.save_instruction(&valid("dup")).await.unwrap();
        let keep = store.save_instruction(&valid("keep")).await.unwrap();
        store.save_instruction(&valid("dup")).await.unwrap();

        assert!(store.delete_instruction(&valid("dup")).await.unwrap());
        assert_eq!(store.saved_instructions().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn deleting_default_is_a_noop() {
        let (_, store) = store();
        store.save_instruction(&valid("a")).await.unwrap();
        assert!(!store
            .delete_instruction(&store.default_instruction())
            .await
            .unwrap());
        assert_eq!(store.saved_instructions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tampered_records_still_load() {
        let (backend, store) = store();
        let id = InstructionId::random();
        let raw = format!(r#"[{{"uuid":"{id}","name":"","text":"no placeholders"}}]"#);
        backend.insert_raw(DEFAULT_COLLECTION_KEY, raw).await;

        let saved = store.saved_instructions().await.unwrap();
        assert_eq!(saved, vec![Instruction::persisted(id, "", "no placeholders")]);

        let err = store.save_instruction(&saved[0]).await.expect_err("invalid");
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn undecodable_collection_is_reported() {
        let (backend, store) = store();
        backend.insert_raw(DEFAULT_COLLECTION_KEY, "not json").await;
        let err = store.saved_instructions().await.expect_err("corrupted");
        assert!(matches!(err, StoreError::Corrupted { .. }));
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn storage_failures_surface_and_preserve_collection() {
        let (backend, store) = store();
        let kept = store.save_instruction(&valid("kept")).await.unwrap();

        backend.set_fail_writes(true);
        let err = store
            .save_instruction(&valid("lost"))
            .await
            .expect_err("write fails");
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
        let err = store.delete_instruction(&kept).await.expect_err("write fails");
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));

        backend.set_fail_writes(false);
        assert_eq!(store.saved_instructions().await.unwrap(), vec![kept]);

        backend.set_fail_reads(true);
        let err = store.saved_instructions().await.expect_err("read fails");
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }

    #[tokio::test]
    async fn custom_collection_key_is_isolated() {
        let backend = Arc::new(MemoryBackend::new());
        let work = InstructionStore::new(backend.clone()).with_collection_key("work");
        let home = InstructionStore::new(backend.clone());

        work.save_instruction(&valid("w")).await.unwrap();
        assert_eq!(work.collection_key(), "work");
        assert!(home.saved_instructions().await.unwrap().is_empty());
        assert!(backend.get_raw("work").await.is_some());
    }
}
