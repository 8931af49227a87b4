//! Summary computation
//!
//! Turns a schema-validated table into a `Summary`: row count, per-column
//! arithmetic means and the `Type` value distribution.
//!
//! Numeric cells follow the **zero substitution policy**: a cell that fails
//! to parse as a float (empty, non-numeric, malformed) is counted as `0.0`.
//! Coercion never fails the pipeline; the substitution is a deliberate lossy
//! rule and is covered by tests, not an accident of a parser.

use crate::ingest::RawTable;
use crate::models::{Averages, Summary, TypeDistribution};
use tracing::debug;

/// The numeric columns that feed the averages.
pub const NUMERIC_COLUMNS: [&str; 3] = ["Flowrate", "Pressure", "Temperature"];

/// Error during summary computation
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// A required column was absent. Callers treat this as "no summary
    /// produced" rather than failing the upload.
    #[error("incomplete schema: missing column '{0}'")]
    IncompleteSchema(String),
}

/// Computes the write-once summary for a validated table.
pub struct SummaryComputer;

impl SummaryComputer {
    pub fn new() -> Self {
        Self
    }

    /// Compute a summary. Expects a table that passed `SchemaValidator`; a
    /// missing column surfaces as `IncompleteSchema`.
    ///
    /// A zero-row table yields a summary with all averages at 0.0 rather than
    /// no summary at all, so empty datasets remain reportable.
    pub fn compute(&self, table: &RawTable) -> Result<Summary, SummaryError> {
        let total_count = table.row_count() as u64;

        let mut means = [0.0f64; 3];
        for (slot, col) in means.iter_mut().zip(NUMERIC_COLUMNS) {
            let cells = table
                .column(col)
                .ok_or_else(|| SummaryError::IncompleteSchema(col.to_string()))?;
            let sum: f64 = cells.map(coerce_numeric).sum();
            *slot = if total_count == 0 {
                0.0
            } else {
                round2(sum / total_count as f64)
            };
        }

        let mut type_distribution = TypeDistribution::new();
        let types = table
            .column("Type")
            .ok_or_else(|| SummaryError::IncompleteSchema("Type".to_string()))?;
        for value in types {
            *type_distribution.entry(value.to_string()).or_insert(0) += 1;
        }

        Ok(Summary {
            total_count,
            averages: Averages {
                flowrate: means[0],
                pressure: means[1],
                temperature: means[2],
            },
            type_distribution,
        })
    }
}

impl Default for SummaryComputer {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero substitution policy: unparseable numeric cells count as 0.0.
fn coerce_numeric(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            debug!(cell, "numeric coercion fell back to 0.0");
            0.0
        }
    }
}

/// Round to 2 decimals, half away from zero (the convention `f64::round`
/// implements).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
