//! CSV importer
//!
//! Minimal comma-separated parser: UTF-8 text, one header row, `\n` or `\r\n`
//! line endings, no quoting dialect. Rows shorter than the header are padded
//! with empty cells and longer rows are truncated, so every row has header
//! arity after parsing.

use super::{IngestError, RawTable};

/// Importer for comma-separated equipment data files.
pub struct CsvImporter;

impl CsvImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw uploaded bytes into a `RawTable`.
    ///
    /// Fails with `MalformedInput` when the bytes are not UTF-8 text or the
    /// file has no header row.
    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable, IngestError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| IngestError::MalformedInput(format!("not UTF-8 text: {}", e)))?;

        let mut lines = text.lines().map(|l| l.strip_suffix('\r').unwrap_or(l));

        let header_line = lines
            .next()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| IngestError::MalformedInput("missing header row".to_string()))?;

        let headers: Vec<String> = header_line.split(',').map(str::to_string).collect();
        let arity = headers.len();

        let mut rows = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let mut cells: Vec<String> = line.split(',').map(str::to_string).collect();
            cells.resize(arity, String::new());
            rows.push(cells);
        }

        Ok(RawTable::new(headers, rows))
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let importer = CsvImporter::new();
        let table = importer
            .parse(b"Equipment Name,Type,Flowrate\nPump1,Pump,10\nValve1,Valve,3\n")
            .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.headers().len(), 3);
        let flow: Vec<&str> = table.column("Flowrate").unwrap().collect();
        assert_eq!(flow, vec!["10", "3"]);
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        let importer = CsvImporter::new();
        let table = importer
            .parse(b"Name,Type\r\nPump1,Pump\r\n\r\nValve1,Valve\r\n")
            .unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let importer = CsvImporter::new();
        let table = importer.parse(b"Name,Type,Flowrate\nPump1,Pump\n").unwrap();
        let flow: Vec<&str> = table.column("Flowrate").unwrap().collect();
        assert_eq!(flow, vec![""]);
    }

    #[test]
    fn test_header_lookup_trims_whitespace() {
        let importer = CsvImporter::new();
        let table = importer.parse(b"Name, Flowrate \nPump1,10\n").unwrap();
        assert!(table.has_column("Flowrate"));
        assert_eq!(table.column_index("Flowrate"), Some(1));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let importer = CsvImporter::new();
        assert!(matches!(
            importer.parse(b""),
            Err(IngestError::MalformedInput(_))
        ));
        assert!(matches!(
            importer.parse(b"  \n"),
            Err(IngestError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_non_utf8_is_malformed() {
        let importer = CsvImporter::new();
        assert!(matches!(
            importer.parse(&[0xff, 0xfe, 0x00]),
            Err(IngestError::MalformedInput(_))
        ));
    }
}
