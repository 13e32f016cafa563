// ============================================================
// SUMMARIZER USE CASE
// ============================================================
// Deterministic summary report over a parsed table

use crate::domain::error::{AppError, Result};
use crate::domain::table::{
    CellValue, Column, ColumnInfo, MissingCount, NumericSummary, SummaryReport, Table,
};

/// Compute the summary report for a table.
///
/// Pure: the same table always produces the same report.
pub fn summarize(table: &Table) -> Result<SummaryReport> {
    let column_info = table
        .columns()
        .iter()
        .map(|c| ColumnInfo {
            name: c.name.clone(),
            dtype: c.dtype,
        })
        .collect();

    let missing = table
        .columns()
        .iter()
        .map(|c| (c, c.missing_count()))
        .filter(|(_, count)| *count > 0)
        .map(|(c, count)| MissingCount {
            name: c.name.clone(),
            count,
        })
        .collect();

    let numeric = table
        .columns()
        .iter()
        .filter(|c| c.dtype.is_numeric())
        .map(describe_column)
        .collect::<Result<Vec<_>>>()?;

    Ok(SummaryReport {
        rows: table.row_count(),
        columns: table.column_count(),
        column_info,
        missing,
        numeric,
    })
}

fn describe_column(column: &Column) -> Result<NumericSummary> {
    let mut values = Vec::with_capacity(column.len());
    for (row, cell) in column.cells.iter().enumerate() {
        match cell {
            CellValue::Missing => {}
            CellValue::Int(_) | CellValue::Float(_) => values.extend(cell.as_f64()),
            other => {
                return Err(AppError::ComputationError(format!(
                    "column '{}' is {} but row {} holds {:?}",
                    column.name, column.dtype, row, other
                )))
            }
        }
    }
    Ok(describe(&column.name, values))
}

/// Descriptive statistics over non-missing values.
pub fn describe(column: &str, mut values: Vec<f64>) -> NumericSummary {
    values.sort_by(|a, b| a.total_cmp(b));

    NumericSummary {
        column: column.to_string(),
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: values.first().copied().unwrap_or(f64::NAN),
        p25: percentile(&values, 0.25),
        p50: percentile(&values, 0.50),
        p75: percentile(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample standard deviation; undefined (`NaN`) below two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Linear interpolation between closest ranks at position `(n - 1) * q`.
/// `sorted` must be in ascending order.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let (low, high) = (sorted[lower], sorted[upper]);
    // Equal neighbours (including equal infinities) need no interpolation.
    if low == high {
        return low;
    }
    low + (high - low) * (position - lower as f64)
}
