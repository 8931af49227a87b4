//! Dataset record model

use crate::models::Summary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonically increasing identifier assigned by the record store.
pub type DatasetId = u64;

/// Opaque reference into the blob store (the stored raw file).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl BlobRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored dataset.
///
/// `summary` is written once at creation time and is `None` when the uploaded
/// table did not satisfy the required schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: DatasetId,
    pub blob: BlobRef,
    pub created_at: DateTime<Utc>,
    pub summary: Option<Summary>,
}

impl DatasetRecord {
    /// Ordering key for recency: newer timestamps win, identical timestamps
    /// are broken by the higher identifier.
    pub fn recency_key(&self) -> (DateTime<Utc>, DatasetId) {
        (self.created_at, self.id)
    }
}
