//! Storage collaborators
//!
//! Defines the two traits the pipeline consumes and their implementations:
//! - `DatasetStore`: record metadata (id allocation, recency listing)
//! - `BlobStore`: raw uploaded files
//!
//! Backends:
//! - `memory`: in-process stores for tests and embedding
//! - `filesystem`: tokio-fs backed stores (feature `native-fs`)

use crate::models::{BlobRef, DatasetId, DatasetRecord, Summary};
use async_trait::async_trait;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Blob not found: {0}")]
    BlobNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Record store for dataset metadata.
///
/// The store assigns identifiers (monotonically increasing) and creation
/// timestamps. `delete` is idempotent: deleting an absent record succeeds.
#[async_trait(?Send)]
pub trait DatasetStore: Send + Sync {
    /// Create a record for a stored blob. The summary is written here, once,
    /// and never updated afterwards.
    async fn create(
        &self,
        blob: BlobRef,
        summary: Option<Summary>,
    ) -> Result<DatasetRecord, StorageError>;

    /// All records, most recent first (creation time, ties by higher id).
    async fn list_by_recency(&self) -> Result<Vec<DatasetRecord>, StorageError>;

    /// Look up a record by id.
    async fn get(&self, id: DatasetId) -> Result<Option<DatasetRecord>, StorageError>;

    /// Delete a record. Idempotent.
    async fn delete(&self, id: DatasetId) -> Result<(), StorageError>;
}

/// Blob store for raw uploaded files.
///
/// `delete` is idempotent: an already-absent blob is success, so eviction can
/// be retried safely.
#[async_trait(?Send)]
pub trait BlobStore: Send + Sync {
    /// Persist raw bytes and return a reference to them.
    async fn save(&self, bytes: &[u8]) -> Result<BlobRef, StorageError>;

    /// Read a blob back.
    async fn open(&self, blob: &BlobRef) -> Result<Vec<u8>, StorageError>;

    /// Delete a blob. Idempotent.
    async fn delete(&self, blob: &BlobRef) -> Result<(), StorageError>;
}

pub mod memory;

#[cfg(feature = "native-fs")]
pub mod filesystem;

pub use memory::{MemoryBlobStore, MemoryDatasetStore};

#[cfg(feature = "native-fs")]
pub use filesystem::{FileSystemBlobStore, FileSystemDatasetStore};
