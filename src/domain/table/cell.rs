// ============================================================
// CELL VALUE
// ============================================================
// A single table cell and the text inference rules shared by all readers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text values read as missing, matching the usual dataframe NA markers.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One cell of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Infer a typed value from raw text.
    ///
    /// Surrounding whitespace is ignored for classification, but text that stays
    /// text keeps its original form.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();

        if MISSING_MARKERS.contains(&trimmed) {
            return CellValue::Missing;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return CellValue::Int(value);
        }
        if looks_like_float(trimmed) {
            if let Ok(value) = trimmed.parse::<f64>() {
                return CellValue::Float(value);
            }
        }
        match trimmed {
            "True" | "true" | "TRUE" => CellValue::Bool(true),
            "False" | "false" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric view of the cell, `None` for missing and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// A cell as read from a file, paired with the text it was inferred from.
///
/// Columns that end up `object` show the source text rather than the inferred
/// value, so `00501` stays `00501` and `TRUE` stays `TRUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCell {
    pub value: CellValue,
    pub text: Option<String>,
}

impl SourceCell {
    pub fn parse(raw: &str) -> Self {
        Self {
            value: CellValue::from_text(raw),
            text: Some(raw.to_string()),
        }
    }

    pub fn missing() -> Self {
        CellValue::Missing.into()
    }

    /// Text form for an object column; missing cells stay missing.
    pub fn into_text(self) -> CellValue {
        match self.value {
            CellValue::Missing => CellValue::Missing,
            CellValue::Text(value) => CellValue::Text(value),
            value => CellValue::Text(self.text.unwrap_or_else(|| value.to_string())),
        }
    }
}

impl From<CellValue> for SourceCell {
    fn from(value: CellValue) -> Self {
        Self { value, text: None }
    }
}

/// Rust accepts words such as `infinity` that spreadsheet users rarely mean as
/// numbers; only digit-bearing literals and `inf` are treated as floats.
fn looks_like_float(text: &str) -> bool {
    let unsigned = text.trim_start_matches(&['+', '-'][..]);
    unsigned.eq_ignore_ascii_case("inf") || text.chars().any(|c| c.is_ascii_digit())
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => write!(f, "NaN"),
            CellValue::Int(value) => write!(f, "{}", value),
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Text(value) => write!(f, "{}", value),
        }
    }
}
