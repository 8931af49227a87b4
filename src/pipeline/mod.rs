//! Ingestion and reporting pipeline
//!
//! Wires the stages together: parse → schema check → summarize → persist →
//! retention eviction, and, on demand, record lookup → report composition.
//!
//! Ingestion and eviction run under a single-writer critical section so two
//! concurrent uploads can never both act on a stale record set (which could
//! double-delete or leave more than the retention bound behind). Report
//! generation is read-only and takes no lock; a dataset evicted mid-request
//! simply resolves to `NotFound`.

use crate::ingest::{CsvImporter, IngestError};
use crate::models::{DatasetId, DatasetRecord};
use crate::report::{DocumentComposer, ReportDocument, ReportError};
use crate::retention::RetentionPolicy;
use crate::storage::{BlobStore, DatasetStore, StorageError};
use crate::summary::SummaryComputer;
use crate::validation::SchemaValidator;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Error surfaced by pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The uploaded bytes cannot be parsed as tabular data at all. Nothing
    /// is persisted.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// No dataset with this id exists (including one just evicted).
    #[error("dataset {0} not found")]
    NotFound(DatasetId),
    /// The dataset exists but carries no summary; re-uploading data that
    /// satisfies the schema is the only remedy.
    #[error("no summary available for dataset {0}")]
    NoSummaryAvailable(DatasetId),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<IngestError> for PipelineError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedInput(msg) => PipelineError::MalformedInput(msg),
        }
    }
}

/// The orchestrator owning the pipeline stages and storage collaborators.
pub struct Pipeline {
    datasets: Arc<dyn DatasetStore>,
    blobs: Arc<dyn BlobStore>,
    importer: CsvImporter,
    validator: SchemaValidator,
    computer: SummaryComputer,
    composer: DocumentComposer,
    retention: RetentionPolicy,
    ingest_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(datasets: Arc<dyn DatasetStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_retention(datasets, blobs, RetentionPolicy::new())
    }

    pub fn with_retention(
        datasets: Arc<dyn DatasetStore>,
        blobs: Arc<dyn BlobStore>,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            datasets,
            blobs,
            importer: CsvImporter::new(),
            validator: SchemaValidator::new(),
            computer: SummaryComputer::new(),
            composer: DocumentComposer::new(),
            retention,
            ingest_lock: Mutex::new(()),
        }
    }

    /// Ingest an uploaded file.
    ///
    /// A table missing required columns is still stored, just without a
    /// summary; only unparseable bytes or storage failures abort the upload.
    pub async fn ingest(&self, raw: &[u8]) -> Result<DatasetRecord, PipelineError> {
        let table = self.importer.parse(raw)?;

        let check = self.validator.check(&table);
        let summary = if check.passed() {
            match self.computer.compute(&table) {
                Ok(summary) => Some(summary),
                Err(err) => {
                    warn!(error = %err, "summarization skipped");
                    None
                }
            }
        } else {
            warn!(missing = ?check.missing, "schema check failed, storing without summary");
            None
        };

        let _guard = self.ingest_lock.lock().await;
        let blob = self.blobs.save(raw).await?;
        let record = self.datasets.create(blob, summary).await?;
        info!(id = record.id, rows = table.row_count(), "dataset ingested");

        self.evict_stale().await?;
        Ok(record)
    }

    /// Re-apply the retention bound. Idempotent; returns the number of
    /// records evicted.
    pub async fn run_retention(&self) -> Result<usize, PipelineError> {
        let _guard = self.ingest_lock.lock().await;
        self.evict_stale().await
    }

    // Caller must hold the ingest lock.
    async fn evict_stale(&self) -> Result<usize, PipelineError> {
        let records = self.datasets.list_by_recency().await?;
        let decision = self.retention.decide(&records);
        let evicted = decision.evict.len();

        for victim in decision.evict {
            // Blob first, then metadata; both deletes are idempotent so a
            // partially-evicted record can be cleaned up by the next pass.
            self.blobs.delete(&victim.blob).await?;
            self.datasets.delete(victim.id).await?;
            info!(id = victim.id, "dataset evicted");
        }
        Ok(evicted)
    }

    /// Render the report for a stored dataset.
    pub async fn get_report(&self, id: DatasetId) -> Result<ReportDocument, PipelineError> {
        let record = self
            .datasets
            .get(id)
            .await?
            .ok_or(PipelineError::NotFound(id))?;
        let summary = record
            .summary
            .as_ref()
            .ok_or(PipelineError::NoSummaryAvailable(id))?;
        Ok(self.composer.compose(summary, record.id, record.created_at)?)
    }

    /// Stored datasets, most recent first.
    pub async fn list(&self) -> Result<Vec<DatasetRecord>, PipelineError> {
        Ok(self.datasets.list_by_recency().await?)
    }
}
