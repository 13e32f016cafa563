pub mod error;
pub mod file_format;
pub mod llm_config;
pub mod narrative;

// Tabular data and summary report
pub mod table;
