// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV bytes with encoding detection into a typed table

use std::borrow::Cow;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{SourceCell, Table};

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse raw upload bytes. Empty or whitespace-only input yields an empty table.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let content = decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string, first row as header
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        if content.trim().is_empty() {
            return Ok(Table::default());
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| AppError::ParseError(format!("Failed to parse CSV row: {}", e)))?;

            if is_blank(&record) {
                continue;
            }
            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }

            rows.push(record.iter().map(SourceCell::parse).collect());
        }

        debug!(columns = width, rows = rows.len(), "parsed CSV content");
        Table::from_rows(headers, rows)
    }
}

/// UTF-8 first (BOM aware), Windows-1252 as the fallback for legacy exports.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let (content, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return content;
    }
    let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    content
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{CellValue, ColumnType};

    #[test]
    fn test_parse_simple_csv() {
        let table = CsvParser::new()
            .parse_bytes(b"name,age,city\nAlice,30,NYC\nBob,25,LA")
            .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.headers(), vec!["name", "age", "city"]);
        assert_eq!(table.column("age").unwrap().dtype, ColumnType::Int64);
        assert_eq!(table.column("name").unwrap().dtype, ColumnType::Object);
    }

    #[test]
    fn test_trailing_empty_field_is_missing() {
        let table = CsvParser::new().parse_bytes(b"a,b\n1,2\n3,\n").unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("b").unwrap().missing_count(), 1);
        assert_eq!(table.column("a").unwrap().missing_count(), 0);
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        let table = CsvParser::new().parse_bytes(b"").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);

        let table = CsvParser::new().parse_bytes(b"  \n").unwrap();
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_header_only() {
        let table = CsvParser::new().parse_bytes(b"a,b,c\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_too_many_fields_is_parse_error() {
        let err = CsvParser::new().parse_bytes(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            AppError::ParseError(msg) => assert!(msg.contains("Expected 2 fields"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_object_column_keeps_original_text() {
        let table = CsvParser::new()
            .parse_bytes(b"zip\n00501\nABC\n2.0\nTRUE\n")
            .unwrap();

        let zip = table.column("zip").unwrap();
        assert_eq!(zip.dtype, ColumnType::Object);
        let texts: Vec<String> = zip.cells.iter().map(|c| c.to_string()).collect();
        assert_eq!(texts, vec!["00501", "ABC", "2.0", "TRUE"]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = CsvParser::new().parse_bytes(b"a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_bom_and_latin1() {
        let table = CsvParser::new()
            .parse_bytes(b"\xEF\xBB\xBFcity\nParis\n")
            .unwrap();
        assert_eq!(table.headers(), vec!["city"]);

        let table = CsvParser::new().parse_bytes(b"city\nS\xE3o Paulo\n").unwrap();
        assert_eq!(
            table.column("city").unwrap().cells[0],
            CellValue::Text("São Paulo".to_string())
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let table = CsvParser::new()
            .with_delimiter(b';')
            .parse_bytes(b"a;b\n1;2\n")
            .unwrap();
        assert_eq!(table.column_count(), 2);
    }
}
