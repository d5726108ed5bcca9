//! Key-value persistence boundary used by the store.

use async_trait::async_trait;
use bytes::Bytes;

use crate::StoreResult;

/// Durable key-value storage holding serialized collections.
///
/// Implementations report I/O failures as
/// [`StoreError::StorageUnavailable`](crate::StoreError::StorageUnavailable).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the value stored under `key`, or `None` when the key was never written.
    async fn read(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Replaces the value stored under `key`.
    ///
    /// Must be atomic: a failed write leaves the previous value readable.
    async fn write(&self, key: &str, value: Bytes) -> StoreResult<()>;
}
