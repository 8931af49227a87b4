//! Equipment Analytics SDK - shared library for equipment dataset operations
//!
//! Provides unified interfaces for:
//! - CSV ingestion and schema validation
//! - Summary statistics (counts, averages, type distribution)
//! - Bounded dataset retention with destructive eviction
//! - PDF report generation (metrics, table, chart, insight)
//! - Storage backends (in-memory, native filesystem)

pub mod cli;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod provision;
pub mod report;
pub mod retention;
pub mod storage;
pub mod summary;
pub mod validation;

// Re-export commonly used types
pub use storage::{BlobStore, DatasetStore, StorageError};
pub use storage::{MemoryBlobStore, MemoryDatasetStore};
#[cfg(feature = "native-fs")]
pub use storage::{FileSystemBlobStore, FileSystemDatasetStore};

pub use ingest::{CsvImporter, IngestError, RawTable};
pub use pipeline::{Pipeline, PipelineError};
pub use report::{ChartRenderer, DocumentComposer, ReportDocument, ReportError};
pub use retention::{RetentionDecision, RetentionPolicy};
pub use summary::{SummaryComputer, SummaryError};
pub use validation::{SchemaCheck, SchemaValidator, REQUIRED_COLUMNS};

// Re-export models
pub use models::{Averages, BlobRef, DatasetId, DatasetRecord, Summary, TypeDistribution};

// Re-export provisioning types
pub use provision::{ensure_admin, AdminCredentials, ProvisionOutcome, UserAccount, UserStore};
