// ============================================================
// TABLE
// ============================================================
// Ordered named columns of equal length

use super::{CellValue, Column, SourceCell};
use crate::domain::error::{AppError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(AppError::ValidationError(format!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.len(),
                row_count
            )));
        }
        Ok(Self { columns, row_count })
    }

    /// Build a table from a header row and row-major cells, inferring dtypes.
    ///
    /// Rows shorter than the header are padded with missing cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<SourceCell>>) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Vec<SourceCell>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in row {}, saw {}",
                    width,
                    index + 1,
                    row.len()
                )));
            }
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or_else(SourceCell::missing));
            }
        }

        let columns = normalize_headers(headers)
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::infer(name, cells))
            .collect();

        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Row-major view of the cells, in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.row_count).map(move |row| self.columns.iter().map(|c| &c.cells[row]).collect())
    }

    /// First `n` rows as a new table; dtypes are carried over unchanged.
    pub fn head(&self, n: usize) -> Table {
        let take = n.min(self.row_count);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.dtype, c.cells[..take].to_vec()))
            .collect();
        Table {
            columns,
            row_count: take,
        }
    }
}

/// Blank headers become `Unnamed: <index>`, repeats get `.1`, `.2`, ... suffixes.
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.push(name);
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::ColumnType;

    fn row(values: &[&str]) -> Vec<SourceCell> {
        values.iter().map(|v| SourceCell::parse(v)).collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = Table::from_rows(headers(&["a", "b"]), vec![row(&["1", "2"]), row(&["3"])])
            .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("b").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_from_rows_rejects_long_rows() {
        let err = Table::from_rows(headers(&["a"]), vec![row(&["1", "2"])]).unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_header_normalization() {
        let table = Table::from_rows(headers(&["x", "", "x", "x"]), Vec::new()).unwrap();
        assert_eq!(table.headers(), vec!["x", "Unnamed: 1", "x.1", "x.2"]);
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let columns = vec![
            Column::new("a", ColumnType::Int64, vec![CellValue::Int(1)]),
            Column::new("b", ColumnType::Int64, Vec::new()),
        ];
        assert!(Table::new(columns).is_err());
    }

    #[test]
    fn test_head_and_rows() {
        let table = Table::from_rows(
            headers(&["n"]),
            vec![row(&["1"]), row(&["2"]), row(&["3"])],
        )
        .unwrap();

        let preview = table.head(2);
        assert_eq!(preview.row_count(), 2);
        assert_eq!(preview.columns()[0].dtype, ColumnType::Int64);

        let rows: Vec<_> = preview.rows().collect();
        assert_eq!(rows, vec![vec![&CellValue::Int(1)], vec![&CellValue::Int(2)]]);
        assert_eq!(table.head(10).row_count(), 3);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::default();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
