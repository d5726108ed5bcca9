//! In-memory storage backend for tests and ephemeral stores.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::backend::StorageBackend;
use crate::{StoreError, StoreResult};

/// Volatile key-value backend.
///
/// Supports failure injection and artificial write latency so that error
/// propagation and mutation ordering can be exercised without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Bytes>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_latency: Option<Duration>,
    writes: AtomicUsize,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every write by `latency` before it is applied.
    #[must_use]
    pub fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    /// Makes subsequent reads fail with [`StoreError::StorageUnavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail with [`StoreError::StorageUnavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns how many writes have been applied.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stores raw bytes under `key`, bypassing failure injection.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    /// Returns the raw bytes stored under `key`.
    pub async fn get_raw(&self, key: &str) -> Option<Bytes> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<Bytes>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::storage_unavailable("simulated read error"));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Bytes) -> StoreResult<()> {
        if let Some(latency) = self.write_latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::storage_unavailable("simulated write error"));
        }
        self.entries.write().await.insert(key.to_owned(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
