// ============================================================
// TABULAR INFRASTRUCTURE LAYER
// ============================================================
// CSV and spreadsheet readers producing typed tables

mod csv_parser;
mod excel_parser;

pub use csv_parser::CsvParser;
pub use excel_parser::ExcelParser;
