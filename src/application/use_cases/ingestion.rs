// ============================================================
// INGESTION USE CASE
// ============================================================
// Extension policy, format dispatch and bounded previews

use tracing::info;

use crate::domain::error::Result;
use crate::domain::file_format::FileFormat;
use crate::domain::table::Table;
use crate::infrastructure::tabular::{CsvParser, ExcelParser};

pub const DEFAULT_PREVIEW_ROWS: usize = 10;

pub struct IngestionUseCase {
    csv: CsvParser,
    excel: ExcelParser,
    preview_rows: usize,
}

impl IngestionUseCase {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            csv: CsvParser::new(),
            excel: ExcelParser::new(),
            preview_rows,
        }
    }

    /// Parse upload bytes according to their file extension.
    ///
    /// The extension is checked before any byte is read.
    pub fn parse(&self, bytes: &[u8], extension: &str) -> Result<Table> {
        let format = FileFormat::from_extension(extension)?;
        self.parse_format(bytes, format)
    }

    pub fn parse_format(&self, bytes: &[u8], format: FileFormat) -> Result<Table> {
        let table = match format {
            FileFormat::Csv => self.csv.parse_bytes(bytes)?,
            FileFormat::Xls | FileFormat::Xlsx => self.excel.parse_bytes(bytes, format)?,
        };

        info!(
            format = format.extension(),
            rows = table.row_count(),
            columns = table.column_count(),
            "ingested upload"
        );
        Ok(table)
    }

    /// First `preview_rows` rows of the table.
    pub fn preview(&self, table: &Table) -> Table {
        table.head(self.preview_rows)
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }
}

impl Default for IngestionUseCase {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_ROWS)
    }
}

/// Parse with default settings.
pub fn parse(bytes: &[u8], extension: &str) -> Result<Table> {
    IngestionUseCase::default().parse(bytes, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;

    #[test]
    fn test_parse_csv() {
        let table = parse(b"a,b\n1,2\n3,\n", ".csv").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("b").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_txt_rejected_before_parsing() {
        let err = parse(b"a,b\n1,2\n", ".txt").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_malformed_spreadsheet() {
        let err = parse(b"a,b\n1,2\n", "xlsx").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_empty_csv_is_zero_rows() {
        let table = parse(b"", "csv").unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_preview_is_bounded() {
        let csv: String = std::iter::once("n\n".to_string())
            .chain((0..25).map(|i| format!("{}\n", i)))
            .collect();
        let ingestion = IngestionUseCase::new(10);
        let table = ingestion.parse(csv.as_bytes(), "csv").unwrap();

        assert_eq!(table.row_count(), 25);
        assert_eq!(ingestion.preview(&table).row_count(), 10);
    }
}
