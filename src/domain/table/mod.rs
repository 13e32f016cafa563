// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Typed in-memory tables and the deterministic summary report
// No I/O, no async, no external dependencies

mod cell;
mod column;
mod report;
mod table;

pub use cell::{CellValue, SourceCell, MISSING_MARKERS};
pub use column::{Column, ColumnType};
pub use report::{ColumnInfo, MissingCount, NumericSummary, SummaryReport, NO_MISSING_VALUES, NO_NUMERIC_COLUMNS};
pub use table::Table;
