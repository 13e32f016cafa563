pub mod analysis;
pub mod ingestion;
pub mod narrator;
pub mod summarizer;
