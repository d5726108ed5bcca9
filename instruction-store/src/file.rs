//! File-backed storage writing one JSON document per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::backend::StorageBackend;
use crate::{StoreError, StoreResult};

/// Stores each key as `<root>/<key>.json`.
///
/// Writes go to a uniquely named temp file which is synced and then renamed
/// over the target, so readers observe either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at the supplied directory.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] when the key is empty or would
    /// escape the root directory.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    let reason = if key.trim().is_empty() {
        "key must not be empty"
    } else if key.contains(['/', '\\']) {
        "key must not contain path separators"
    } else if key.starts_with('.') {
        "key must not start with a dot"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidKey {
        key: key.to_owned(),
        reason,
    })
}

async fn atomic_write(final_path: &Path, data: &[u8]) -> StoreResult<()> {
    let file_name = final_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("collection");
    let temp_path = final_path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    let result = async {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, final_path).await
    }
    .await;

    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StoreError::storage_unavailable(format!(
            "failed to write {}: {err}",
            final_path.display()
        )));
    }
    Ok(())
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<Bytes>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::storage_unavailable(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn write(&self, key: &str, value: Bytes) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await.map_err(|err| {
            StoreError::storage_unavailable(format!(
                "failed to create {}: {err}",
                self.root.display()
            ))
        })?;
        atomic_write(&path, &value).await?;
        debug!(path = %path.display(), bytes = value.len(), "wrote collection");
        Ok(())
    }
}
