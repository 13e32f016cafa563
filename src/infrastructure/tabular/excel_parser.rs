// ============================================================
// EXCEL PARSER
// ============================================================
// First worksheet of an .xls/.xlsx workbook as a typed table

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::file_format::FileFormat;
use crate::domain::table::{CellValue, SourceCell, Table};

#[derive(Default)]
pub struct ExcelParser;

impl ExcelParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse workbook bytes. Only the first sheet is read, its first row is the header.
    pub fn parse_bytes(&self, bytes: &[u8], format: FileFormat) -> Result<Table> {
        let range = match format {
            FileFormat::Xlsx => first_sheet::<Xlsx<_>>(bytes)?,
            FileFormat::Xls => first_sheet::<Xls<_>>(bytes)?,
            FileFormat::Csv => {
                return Err(AppError::Internal(
                    "CSV input routed to the spreadsheet reader".to_string(),
                ))
            }
        };

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Table::default());
        };

        let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
        let body: Vec<Vec<SourceCell>> = rows
            .map(|row| row.iter().map(source_cell).collect())
            .collect();

        debug!(columns = headers.len(), rows = body.len(), "parsed worksheet");
        Table::from_rows(headers, body)
    }
}

fn first_sheet<'a, R>(bytes: &'a [u8]) -> Result<Range<Data>>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook = R::new(Cursor::new(bytes))
        .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))
}

/// String cells keep their text for object columns; native values render as-is.
fn source_cell(cell: &Data) -> SourceCell {
    match cell {
        Data::String(value) => SourceCell::parse(value),
        other => cell_value(other).into(),
    }
}

/// Spreadsheets store every number as a float; whole values read back as integers.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) if is_whole(*value) => CellValue::Int(*value as i64),
        Data::Float(value) => CellValue::Float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::String(value) => CellValue::from_text(value),
        other => CellValue::Text(other.to_string()),
    }
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::summarize;
    use crate::domain::table::ColumnType;
    use rust_xlsxwriter::Workbook;

    fn two_sheet_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();

        let sales = workbook.add_worksheet();
        sales.set_name("Sales").unwrap();
        for (col, header) in ["region", "units", "price", "active", "code"].iter().enumerate() {
            sales.write_string(0, col as u16, *header).unwrap();
        }
        sales.write_string(1, 0, "North").unwrap();
        sales.write_number(1, 1, 10).unwrap();
        sales.write_number(1, 2, 2.5).unwrap();
        sales.write_boolean(1, 3, true).unwrap();
        sales.write_string(1, 4, "00501").unwrap();
        sales.write_string(2, 0, "South").unwrap();
        sales.write_number(2, 1, 20).unwrap();
        sales.write_number(2, 2, 4).unwrap();
        sales.write_boolean(2, 3, false).unwrap();
        sales.write_string(2, 4, "A1").unwrap();

        let other = workbook.add_worksheet();
        other.set_name("Ignored").unwrap();
        other.write_string(0, 0, "unrelated").unwrap();
        for row in 1..=5u32 {
            other.write_number(row, 0, row).unwrap();
        }

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_first_sheet_only() {
        let table = ExcelParser::new()
            .parse_bytes(&two_sheet_workbook(), FileFormat::Xlsx)
            .unwrap();

        assert_eq!(table.headers(), vec!["region", "units", "price", "active", "code"]);
        assert_eq!(table.row_count(), 2);
        assert!(table.column("unrelated").is_none());

        assert_eq!(table.column("region").unwrap().dtype, ColumnType::Object);
        assert_eq!(table.column("units").unwrap().dtype, ColumnType::Int64);
        assert_eq!(table.column("price").unwrap().dtype, ColumnType::Float64);
        assert_eq!(table.column("active").unwrap().dtype, ColumnType::Bool);

        let code = table.column("code").unwrap();
        assert_eq!(code.dtype, ColumnType::Object);
        assert_eq!(code.cells[0], CellValue::Text("00501".to_string()));
    }

    #[test]
    fn test_workbook_summary() {
        let table = ExcelParser::new()
            .parse_bytes(&two_sheet_workbook(), FileFormat::Xlsx)
            .unwrap();
        let report = summarize(&table).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.columns, 5);
        assert_eq!(report.missing_count("units"), Some(0));

        let units = report.numeric_summary("units").unwrap();
        assert_eq!(units.count, 2);
        assert_eq!(units.mean, 15.0);
        assert_eq!(units.min, 10.0);
        assert_eq!(units.max, 20.0);

        let price = report.numeric_summary("price").unwrap();
        assert_eq!(price.mean, 3.25);
        assert!(report.numeric_summary("active").is_none());
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Missing);
        assert_eq!(cell_value(&Data::Float(3.0)), CellValue::Int(3));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_value(&Data::String("N/A".to_string())),
            CellValue::Missing
        );
        assert_eq!(
            cell_value(&Data::String("42".to_string())),
            CellValue::Int(42)
        );
    }

    #[test]
    fn test_garbage_xlsx_is_parse_error() {
        let err = ExcelParser::new()
            .parse_bytes(b"definitely not a zip archive", FileFormat::Xlsx)
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_garbage_xls_is_parse_error() {
        let err = ExcelParser::new()
            .parse_bytes(b"definitely not a compound document", FileFormat::Xls)
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
