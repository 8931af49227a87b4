//! CLI error type

use crate::pipeline::PipelineError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),
    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
