//! Ingestion front-end
//!
//! Parses uploaded bytes into a `RawTable`. Only comma-separated files with a
//! header row are supported; dialect detection is out of scope.

pub mod csv;

/// Error during ingestion parsing
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The uploaded bytes cannot be parsed as tabular data at all.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// An in-memory parsed table. Transient; exists only during ingestion.
///
/// Headers keep their raw text; lookups trim whitespace on both sides so that
/// ` Flowrate ` and `Flowrate` address the same column.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by trimmed, case-sensitive name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom. `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }
}

pub use csv::CsvImporter;
