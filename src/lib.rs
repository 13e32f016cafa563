mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::summarize;
pub use application::use_cases::ingestion::parse;
pub use domain::error::{AppError, Result};
pub use domain::table::{SummaryReport, Table};
