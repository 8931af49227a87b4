//! Report generation
//!
//! A report is an ephemeral, regenerable artifact: the composer is a pure
//! function of one summary plus its dataset id and creation timestamp, so two
//! identical inputs yield byte-identical documents. Nothing here is ever
//! persisted.

pub mod chart;
pub mod document;

use base64::{engine::general_purpose, Engine as _};

/// Error during report rendering
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Image encoding error: {0}")]
    ImageEncoding(String),
    #[error("Render error: {0}")]
    Render(String),
}

/// A rendered report document (single-page PDF).
#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// Suggested download filename, e.g. `report_3.pdf`.
    pub filename: String,
    /// The PDF bytes.
    pub bytes: Vec<u8>,
}

impl ReportDocument {
    /// Base64 transport shape for string-typed result payloads.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

pub use chart::ChartRenderer;
pub use document::DocumentComposer;
