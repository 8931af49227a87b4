//! In-memory storage backends
//!
//! Used by tests and by embedders that do not need persistence. Both stores
//! are `Mutex`-guarded; none of the trait methods hold a lock across an await
//! point.

use super::{BlobStore, DatasetStore, StorageError};
use crate::models::{BlobRef, DatasetId, DatasetRecord, Summary};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

struct MemoryState {
    next_id: DatasetId,
    records: Vec<DatasetRecord>,
}

/// In-memory dataset record store.
pub struct MemoryDatasetStore {
    inner: Mutex<MemoryState>,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::BackendError("dataset store lock poisoned".to_string()))
    }
}

impl Default for MemoryDatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl DatasetStore for MemoryDatasetStore {
    async fn create(
        &self,
        blob: BlobRef,
        summary: Option<Summary>,
    ) -> Result<DatasetRecord, StorageError> {
        let mut state = self.lock()?;
        let record = DatasetRecord {
            id: state.next_id,
            blob,
            created_at: Utc::now(),
            summary,
        };
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    async fn list_by_recency(&self) -> Result<Vec<DatasetRecord>, StorageError> {
        let state = self.lock()?;
        let mut records = state.records.clone();
        records.sort_by_key(|r| std::cmp::Reverse(r.recency_key()));
        Ok(records)
    }

    async fn get(&self, id: DatasetId) -> Result<Option<DatasetRecord>, StorageError> {
        let state = self.lock()?;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: DatasetId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.records.retain(|r| r.id != id);
        Ok(())
    }
}

/// In-memory blob store keyed by uuid-based references.
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, StorageError> {
        self.blobs
            .lock()
            .map_err(|_| StorageError::BackendError("blob store lock poisoned".to_string()))
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl BlobStore for MemoryBlobStore {
    async fn save(&self, bytes: &[u8]) -> Result<BlobRef, StorageError> {
        let name = format!("{}.csv", Uuid::new_v4());
        self.lock()?.insert(name.clone(), bytes.to_vec());
        Ok(BlobRef::new(name))
    }

    async fn open(&self, blob: &BlobRef) -> Result<Vec<u8>, StorageError> {
        self.lock()?
            .get(blob.as_str())
            .cloned()
            .ok_or_else(|| StorageError::BlobNotFound(blob.to_string()))
    }

    async fn delete(&self, blob: &BlobRef) -> Result<(), StorageError> {
        self.lock()?.remove(blob.as_str());
        Ok(())
    }
}
