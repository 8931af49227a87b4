//! Command implementations

use crate::cli::error::CliError;
use crate::cli::output::{format_dataset_list, format_ingest_result};
use crate::models::DatasetId;
use crate::pipeline::Pipeline;
use crate::storage::{FileSystemBlobStore, FileSystemDatasetStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build a pipeline over filesystem stores rooted at `data_dir`.
fn open_pipeline(data_dir: &Path) -> Pipeline {
    let datasets = Arc::new(FileSystemDatasetStore::new(data_dir));
    let blobs = Arc::new(FileSystemBlobStore::new(data_dir));
    Pipeline::new(datasets, blobs)
}

/// Load input content from file or stdin ("-").
fn load_input(input: &str) -> Result<Vec<u8>, CliError> {
    if input == "-" {
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Handle the ingest command.
pub async fn handle_ingest(data_dir: &Path, input: &str) -> Result<(), CliError> {
    let bytes = load_input(input)?;
    let pipeline = open_pipeline(data_dir);
    let record = pipeline.ingest(&bytes).await?;
    print!("{}", format_ingest_result(&record));
    Ok(())
}

/// Handle the report command.
pub async fn handle_report(
    data_dir: &Path,
    id: DatasetId,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let pipeline = open_pipeline(data_dir);
    let document = pipeline.get_report(id).await?;

    let target: PathBuf = match out {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&document.filename),
    };
    std::fs::write(&target, &document.bytes)
        .map_err(|e| CliError::FileWriteError(target.clone(), e.to_string()))?;
    println!("✅ Wrote {} ({} bytes)", target.display(), document.bytes.len());
    Ok(())
}

/// Handle the list command.
pub async fn handle_list(data_dir: &Path) -> Result<(), CliError> {
    let pipeline = open_pipeline(data_dir);
    let records = pipeline.list().await?;
    print!("{}", format_dataset_list(&records));
    Ok(())
}
