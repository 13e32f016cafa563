// ============================================================
// COLUMN
// ============================================================
// Named, homogeneously typed column and dtype unification

use super::{CellValue, SourceCell};
use serde::{Deserialize, Serialize};

/// Inferred column dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int64,
    Float64,
    Bool,
    Object,
}

impl ColumnType {
    /// Whether the column takes part in the numeric summary.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Object => "object",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub cells: Vec<CellValue>,
}

impl Column {
    /// Build a column with an explicit dtype. Cells are taken as-is.
    pub fn new(name: impl Into<String>, dtype: ColumnType, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            dtype,
            cells,
        }
    }

    /// Build a column from loosely typed cells, unifying them to one dtype.
    pub fn infer(name: impl Into<String>, cells: Vec<SourceCell>) -> Self {
        let dtype = unify(cells.iter().map(|cell| &cell.value));
        let cells = cells.into_iter().map(|cell| coerce(cell, dtype)).collect();
        Self::new(name, dtype, cells)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }
}

fn unify<'a>(cells: impl Iterator<Item = &'a CellValue>) -> ColumnType {
    let mut has_cells = false;
    let mut has_missing = false;
    let mut has_int = false;
    let mut has_float = false;
    let mut has_bool = false;
    let mut has_text = false;

    for cell in cells {
        has_cells = true;
        match cell {
            CellValue::Missing => has_missing = true,
            CellValue::Int(_) => has_int = true,
            CellValue::Float(_) => has_float = true,
            CellValue::Bool(_) => has_bool = true,
            CellValue::Text(_) => has_text = true,
        }
    }

    if !has_cells {
        return ColumnType::Object;
    }

    let numeric = has_int || has_float;
    match (numeric, has_bool, has_text) {
        (false, false, false) => ColumnType::Float64,
        (true, false, false) if has_int && !has_float && !has_missing => ColumnType::Int64,
        (true, false, false) => ColumnType::Float64,
        (false, true, false) if !has_missing => ColumnType::Bool,
        _ => ColumnType::Object,
    }
}

fn coerce(cell: SourceCell, dtype: ColumnType) -> CellValue {
    if dtype == ColumnType::Object {
        return cell.into_text();
    }
    match (dtype, cell.value) {
        (ColumnType::Float64, CellValue::Int(value)) => CellValue::Float(value as f64),
        (_, value) => value,
    }
}
