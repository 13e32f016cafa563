// ============================================================
// SUMMARY REPORT
// ============================================================
// Structured summary facts and their single fixed text rendering

use super::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_MISSING_VALUES: &str = "No missing values detected.";
pub const NO_NUMERIC_COLUMNS: &str = "No numeric columns found.";

const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingCount {
    pub name: String,
    pub count: usize,
}

/// Descriptive statistics for one numeric column.
///
/// Undefined statistics are `NaN` and serialize to JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl NumericSummary {
    fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }
}

/// Deterministic digest of a table.
///
/// `Display` renders the report text: shape, column info, missing values and
/// numeric statistics, separated by blank lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub rows: usize,
    pub columns: usize,
    pub column_info: Vec<ColumnInfo>,
    /// Only columns with at least one missing value, in column order.
    pub missing: Vec<MissingCount>,
    pub numeric: Vec<NumericSummary>,
}

impl SummaryReport {
    /// Missing count for a column, `None` if the table has no such column.
    pub fn missing_count(&self, column: &str) -> Option<usize> {
        self.column_info.iter().find(|c| c.name == column)?;
        Some(
            self.missing
                .iter()
                .find(|m| m.name == column)
                .map(|m| m.count)
                .unwrap_or(0),
        )
    }

    pub fn numeric_summary(&self, column: &str) -> Option<&NumericSummary> {
        self.numeric.iter().find(|s| s.column == column)
    }

    pub fn text(&self) -> String {
        self.to_string()
    }

    fn write_shape(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape: {} rows × {} columns", self.rows, self.columns)
    }

    fn write_column_info(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column Info:")?;
        if self.column_info.is_empty() {
            return write!(f, "\n(none)");
        }
        let width = name_width(self.column_info.iter().map(|c| c.name.as_str()));
        for info in &self.column_info {
            write!(f, "\n{:<width$}    {}", info.name, info.dtype, width = width)?;
        }
        Ok(())
    }

    fn write_missing(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.missing.is_empty() {
            return write!(f, "{}", NO_MISSING_VALUES);
        }
        write!(f, "Missing Values:")?;
        let width = name_width(self.missing.iter().map(|m| m.name.as_str()));
        for entry in &self.missing {
            write!(f, "\n{:<width$}    {}", entry.name, entry.count, width = width)?;
        }
        Ok(())
    }

    fn write_numeric(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numeric.is_empty() {
            return write!(f, "{}", NO_NUMERIC_COLUMNS);
        }
        write!(f, "Summary Statistics (Numerics):")?;

        let cells: Vec<Vec<String>> = self
            .numeric
            .iter()
            .map(|s| s.values().iter().map(|v| format_stat(*v)).collect())
            .collect();
        let widths: Vec<usize> = self
            .numeric
            .iter()
            .zip(&cells)
            .map(|(s, values)| {
                values
                    .iter()
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(s.column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let label_width = name_width(STAT_LABELS.iter().copied());

        write!(f, "\n{:label_width$}", "", label_width = label_width)?;
        for (summary, width) in self.numeric.iter().zip(&widths) {
            write!(f, "  {:>width$}", summary.column, width = width)?;
        }
        for (row, label) in STAT_LABELS.iter().enumerate() {
            write!(f, "\n{:<label_width$}", label, label_width = label_width)?;
            for (values, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", values[row], width = width)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_shape(f)?;
        f.write_str("\n\n")?;
        self.write_column_info(f)?;
        f.write_str("\n\n")?;
        self.write_missing(f)?;
        f.write_str("\n\n")?;
        self.write_numeric(f)
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", value)
    }
}
