//! Filesystem storage backends
//!
//! Blobs live under `blobs/` as uuid-named files; records are JSON documents
//! under `records/`, one per dataset id. Used by the CLI and native apps.
//!
//! ## Security
//!
//! All paths are resolved relative to the base directory and validated to
//! prevent traversal: names containing ".." are rejected outright.

use super::{BlobStore, DatasetStore, StorageError};
use crate::models::{BlobRef, DatasetId, DatasetRecord, Summary};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

const BLOB_DIR: &str = "blobs";
const RECORD_DIR: &str = "records";

/// Resolve `name` under `base`, rejecting traversal attempts.
fn resolve_path(base: &Path, name: &str) -> Result<PathBuf, StorageError> {
    let normalized = name.trim_start_matches('/');
    if normalized.contains("..") {
        return Err(StorageError::PermissionDenied(
            "Path traversal (..) not allowed".to_string(),
        ));
    }

    let full = base.join(normalized);
    for component in full.components() {
        if matches!(component, Component::ParentDir) {
            return Err(StorageError::PermissionDenied(
                "Path traversal not allowed".to_string(),
            ));
        }
    }
    Ok(full)
}

/// Blob store backed by the local filesystem.
pub struct FileSystemBlobStore {
    base_path: PathBuf,
}

impl FileSystemBlobStore {
    /// Create a blob store rooted at `base_path`; blobs land in a `blobs/`
    /// subdirectory which is created on first save.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().join(BLOB_DIR),
        }
    }

    fn blob_path(&self, blob: &BlobRef) -> Result<PathBuf, StorageError> {
        resolve_path(&self.base_path, blob.as_str())
    }
}

#[async_trait(?Send)]
impl BlobStore for FileSystemBlobStore {
    async fn save(&self, bytes: &[u8]) -> Result<BlobRef, StorageError> {
        let blob = BlobRef::new(format!("{}.csv", Uuid::new_v4()));
        let path = self.blob_path(&blob)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to create blob dir: {}", e)))?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write blob {}: {}", blob, e)))?;
        Ok(blob)
    }

    async fn open(&self, blob: &BlobRef) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(blob)?;
        fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::BlobNotFound(blob.to_string())
            } else {
                StorageError::IoError(format!("Failed to read blob {}: {}", blob, e))
            }
        })
    }

    async fn delete(&self, blob: &BlobRef) -> Result<(), StorageError> {
        let path = self.blob_path(blob)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Idempotent: an absent blob is already deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to delete blob {}: {}",
                blob, e
            ))),
        }
    }
}

/// Dataset record store persisting one JSON document per record.
///
/// Identifier allocation reads the persisted high-water mark once and then
/// counts up under an internal lock.
pub struct FileSystemDatasetStore {
    base_path: PathBuf,
    next_id: tokio::sync::Mutex<Option<DatasetId>>,
}

impl FileSystemDatasetStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().join(RECORD_DIR),
            next_id: tokio::sync::Mutex::new(None),
        }
    }

    fn record_path(&self, id: DatasetId) -> Result<PathBuf, StorageError> {
        resolve_path(&self.base_path, &format!("{id}.json"))
    }

    async fn load_all(&self) -> Result<Vec<DatasetRecord>, StorageError> {
        let mut records = Vec::new();
        let mut read_dir = match fs::read_dir(&self.base_path).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => {
                return Err(StorageError::IoError(format!(
                    "Failed to read record dir: {}",
                    e
                )))
            }
        };

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to read record entry: {}", e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path)
                .await
                .map_err(|e| StorageError::IoError(format!("Failed to read record: {}", e)))?;
            let record: DatasetRecord = serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::SerializationError(format!(
                    "Corrupt record {}: {}",
                    path.display(),
                    e
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    async fn allocate_id(&self) -> Result<DatasetId, StorageError> {
        let mut next = self.next_id.lock().await;
        let id = match *next {
            Some(id) => id,
            None => {
                let high_water = self
                    .load_all()
                    .await?
                    .iter()
                    .map(|r| r.id)
                    .max()
                    .unwrap_or(0);
                high_water + 1
            }
        };
        *next = Some(id + 1);
        Ok(id)
    }
}

#[async_trait(?Send)]
impl DatasetStore for FileSystemDatasetStore {
    async fn create(
        &self,
        blob: BlobRef,
        summary: Option<Summary>,
    ) -> Result<DatasetRecord, StorageError> {
        let record = DatasetRecord {
            id: self.allocate_id().await?,
            blob,
            created_at: Utc::now(),
            summary,
        };

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to create record dir: {}", e)))?;
        let bytes = serde_json::to_vec_pretty(&record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let path = self.record_path(record.id)?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write record: {}", e)))?;
        Ok(record)
    }

    async fn list_by_recency(&self) -> Result<Vec<DatasetRecord>, StorageError> {
        let mut records = self.load_all().await?;
        records.sort_by_key(|r| std::cmp::Reverse(r.recency_key()));
        Ok(records)
    }

    async fn get(&self, id: DatasetId) -> Result<Option<DatasetRecord>, StorageError> {
        let path = self.record_path(id)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .map_err(|e| StorageError::SerializationError(e.to_string()))?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to read record {}: {}",
                id, e
            ))),
        }
    }

    async fn delete(&self, id: DatasetId) -> Result<(), StorageError> {
        let path = self.record_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to delete record {}: {}",
                id, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_traversal_blocked() {
        let result = resolve_path(Path::new("/data"), "../etc/passwd");
        assert!(matches!(result, Err(StorageError::PermissionDenied(_))));

        let result = resolve_path(Path::new("/data"), "/foo/../../etc/passwd");
        assert!(matches!(result, Err(StorageError::PermissionDenied(_))));

        assert!(resolve_path(Path::new("/data"), "valid.json").is_ok());
    }

    #[tokio::test]
    async fn test_blob_save_open_delete() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemBlobStore::new(temp.path());

        let blob = store.save(b"Name,Type\nA,Pump\n").await.unwrap();
        assert_eq!(store.open(&blob).await.unwrap(), b"Name,Type\nA,Pump\n");

        store.delete(&blob).await.unwrap();
        // Second delete of an absent file must still succeed.
        store.delete(&blob).await.unwrap();
        assert!(matches!(
            store.open(&blob).await,
            Err(StorageError::BlobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_records_persist_and_ids_resume() {
        let temp = TempDir::new().unwrap();
        {
            let store = FileSystemDatasetStore::new(temp.path());
            let a = store.create(BlobRef::new("a.csv"), None).await.unwrap();
            let b = store.create(BlobRef::new("b.csv"), None).await.unwrap();
            assert_eq!((a.id, b.id), (1, 2));
        }

        // A fresh store over the same directory resumes from the high-water mark.
        let store = FileSystemDatasetStore::new(temp.path());
        let c = store.create(BlobRef::new("c.csv"), None).await.unwrap();
        assert_eq!(c.id, 3);

        let ids: Vec<_> = store
            .list_by_recency()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_get_and_idempotent_delete() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemDatasetStore::new(temp.path());
        let record = store.create(BlobRef::new("a.csv"), None).await.unwrap();

        assert!(store.get(record.id).await.unwrap().is_some());
        assert!(store.get(999).await.unwrap().is_none());

        store.delete(record.id).await.unwrap();
        store.delete(record.id).await.unwrap();
        assert!(store.get(record.id).await.unwrap().is_none());
    }
}
