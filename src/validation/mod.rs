//! Schema validation
//!
//! Checks that a parsed table carries the columns the summarizer needs. A
//! failed check is non-fatal to ingestion: the dataset is stored without a
//! summary.

use crate::ingest::RawTable;

/// Columns a table must contain for summarization. Matching is
/// whitespace-trimmed on both sides and case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Equipment Name",
    "Type",
    "Flowrate",
    "Pressure",
    "Temperature",
];

/// Result of a schema check
#[derive(Debug, Clone)]
pub struct SchemaCheck {
    /// Required columns absent from the table, in declaration order.
    pub missing: Vec<String>,
}

impl SchemaCheck {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Validator for the required equipment-data columns. Pure; no side effects.
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, table: &RawTable) -> SchemaCheck {
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !table.has_column(col))
            .map(|col| col.to_string())
            .collect();
        SchemaCheck { missing }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::CsvImporter;

    #[test]
    fn test_full_schema_passes() {
        let table = CsvImporter::new()
            .parse(b"Equipment Name,Type,Flowrate,Pressure,Temperature\nPump1,Pump,1,2,3\n")
            .unwrap();
        assert!(SchemaValidator::new().check(&table).passed());
    }

    #[test]
    fn test_padded_headers_pass() {
        let table = CsvImporter::new()
            .parse(b" Equipment Name , Type ,Flowrate, Pressure,Temperature \n")
            .unwrap();
        assert!(SchemaValidator::new().check(&table).passed());
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let table = CsvImporter::new()
            .parse(b"Equipment Name,Type,Flowrate\nPump1,Pump,1\n")
            .unwrap();
        let check = SchemaValidator::new().check(&table);
        assert!(!check.passed());
        assert_eq!(check.missing, vec!["Pressure", "Temperature"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let table = CsvImporter::new()
            .parse(b"equipment name,type,flowrate,pressure,temperature\n")
            .unwrap();
        let check = SchemaValidator::new().check(&table);
        assert_eq!(check.missing.len(), 5);
    }
}
