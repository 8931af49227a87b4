//! End-to-end pipeline tests over in-memory stores

use equipment_analytics_sdk::pipeline::{Pipeline, PipelineError};
use equipment_analytics_sdk::storage::{MemoryBlobStore, MemoryDatasetStore};
use std::sync::Arc;

const VALID_CSV: &[u8] = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
Pump1,Pump,10,5,20\n\
Valve1,Valve,bad,7,25\n";

fn pipeline() -> (Pipeline, Arc<MemoryBlobStore>) {
    let datasets = Arc::new(MemoryDatasetStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    (Pipeline::new(datasets, blobs.clone()), blobs)
}

mod ingest_tests {
    use super::*;

    #[tokio::test]
    async fn test_ingest_computes_summary() {
        let (pipeline, _) = pipeline();
        let record = pipeline.ingest(VALID_CSV).await.unwrap();

        let summary = record.summary.expect("summary should be present");
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.averages.flowrate, 5.0);
        assert_eq!(summary.averages.pressure, 6.0);
        assert_eq!(summary.averages.temperature, 22.5);
        assert_eq!(summary.type_distribution["Pump"], 1);
        assert_eq!(summary.type_distribution["Valve"], 1);

        let total: u64 = summary.type_distribution.values().sum();
        assert_eq!(total, summary.total_count);
    }

    #[tokio::test]
    async fn test_missing_schema_is_not_fatal() {
        let (pipeline, blobs) = pipeline();
        let record = pipeline
            .ingest(b"Equipment Name,Type\nPump1,Pump\n")
            .await
            .unwrap();

        // The upload succeeds and the raw file is retained.
        assert!(record.summary.is_none());
        assert_eq!(blobs.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_input_persists_nothing() {
        let (pipeline, blobs) = pipeline();

        let err = pipeline.ingest(&[0xff, 0xfe]).await.unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(_)));

        let err = pipeline.ingest(b"").await.unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(_)));

        assert_eq!(blobs.len(), 0);
        assert!(pipeline.list().await.unwrap().is_empty());
    }
}

mod retention_tests {
    use super::*;

    #[tokio::test]
    async fn test_six_ingestions_keep_the_latest_five() {
        let (pipeline, blobs) = pipeline();
        for _ in 0..6 {
            pipeline.ingest(VALID_CSV).await.unwrap();
        }

        let ids: Vec<u64> = pipeline.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2]);
        // Evicted blobs are gone from storage too.
        assert_eq!(blobs.len(), 5);
    }

    #[tokio::test]
    async fn test_bound_holds_for_many_ingestions() {
        let (pipeline, blobs) = pipeline();
        for _ in 0..12 {
            pipeline.ingest(VALID_CSV).await.unwrap();
        }
        let ids: Vec<u64> = pipeline.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 11, 10, 9, 8]);
        assert_eq!(blobs.len(), 5);
    }

    #[tokio::test]
    async fn test_retention_is_idempotent() {
        let (pipeline, blobs) = pipeline();
        for _ in 0..7 {
            pipeline.ingest(VALID_CSV).await.unwrap();
        }

        assert_eq!(pipeline.run_retention().await.unwrap(), 0);
        assert_eq!(pipeline.run_retention().await.unwrap(), 0);
        assert_eq!(pipeline.list().await.unwrap().len(), 5);
        assert_eq!(blobs.len(), 5);
    }

    #[tokio::test]
    async fn test_evicted_dataset_resolves_to_not_found() {
        let (pipeline, _) = pipeline();
        let first = pipeline.ingest(VALID_CSV).await.unwrap();
        for _ in 0..5 {
            pipeline.ingest(VALID_CSV).await.unwrap();
        }

        let err = pipeline.get_report(first.id).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(id) if id == first.id));
    }
}

mod report_path_tests {
    use super::*;

    #[tokio::test]
    async fn test_report_for_summarized_dataset() {
        let (pipeline, _) = pipeline();
        let record = pipeline.ingest(VALID_CSV).await.unwrap();

        let document = pipeline.get_report(record.id).await.unwrap();
        assert!(document.bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(document.filename, format!("report_{}.pdf", record.id));
    }

    #[tokio::test]
    async fn test_report_without_summary_fails() {
        let (pipeline, _) = pipeline();
        let record = pipeline
            .ingest(b"Equipment Name,Type\nPump1,Pump\n")
            .await
            .unwrap();

        let err = pipeline.get_report(record.id).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoSummaryAvailable(id) if id == record.id));
    }

    #[tokio::test]
    async fn test_report_for_unknown_id_fails() {
        let (pipeline, _) = pipeline();
        let err = pipeline.get_report(42).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_report_for_empty_dataset_never_divides_by_zero() {
        let (pipeline, _) = pipeline();
        // Header only: schema passes, zero rows.
        let record = pipeline
            .ingest(b"Equipment Name,Type,Flowrate,Pressure,Temperature\n")
            .await
            .unwrap();

        let summary = record.summary.as_ref().unwrap();
        assert_eq!(summary.total_count, 0);

        let document = pipeline.get_report(record.id).await.unwrap();
        let notice = b"No summary data available to analyze.";
        assert!(document
            .bytes
            .windows(notice.len())
            .any(|w| w == notice.as_slice()));
    }
}

#[cfg(feature = "native-fs")]
mod filesystem_tests {
    use super::VALID_CSV;
    use equipment_analytics_sdk::pipeline::Pipeline;
    use equipment_analytics_sdk::storage::{FileSystemBlobStore, FileSystemDatasetStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_pipeline_over_filesystem_stores() {
        let temp = TempDir::new().unwrap();
        let datasets = Arc::new(FileSystemDatasetStore::new(temp.path()));
        let blobs = Arc::new(FileSystemBlobStore::new(temp.path()));
        let pipeline = Pipeline::new(datasets, blobs);

        for _ in 0..6 {
            pipeline.ingest(VALID_CSV).await.unwrap();
        }

        let ids: Vec<u64> = pipeline.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2]);

        // Exactly the five surviving blobs remain on disk.
        let blob_files = std::fs::read_dir(temp.path().join("blobs")).unwrap().count();
        assert_eq!(blob_files, 5);

        let report = pipeline.get_report(6).await.unwrap();
        assert!(report.bytes.starts_with(b"%PDF-1.4"));
    }
}
