use super::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upload formats accepted by ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xls,
    Xlsx,
}

impl FileFormat {
    /// Resolve an extension such as `csv`, `.XLSX` or `xls`.
    pub fn from_extension(extension: &str) -> Result<Self> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xls" => Ok(FileFormat::Xls),
            "xlsx" => Ok(FileFormat::Xlsx),
            _ => Err(AppError::UnsupportedFormat(if extension.is_empty() {
                "(none)".to_string()
            } else {
                extension.to_string()
            })),
        }
    }

    /// Resolve the format from an uploaded file name.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        Self::from_extension(&extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xls => "xls",
            FileFormat::Xlsx => "xlsx",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        !matches!(self, FileFormat::Csv)
    }
}
