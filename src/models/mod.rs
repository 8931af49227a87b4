//! Core data types shared across the SDK
//!
//! - `Summary`: the immutable computed statistics for one dataset
//! - `DatasetRecord`: a stored dataset with its blob reference and summary
//! - `BlobRef`: opaque handle into the blob store

pub mod dataset;
pub mod summary;

pub use dataset::{BlobRef, DatasetId, DatasetRecord};
pub use summary::{Averages, Summary, TypeDistribution};
