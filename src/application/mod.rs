pub mod use_cases;

pub use use_cases::analysis::{AnalysisUseCase, Digest, InsightAnalysis, StoryAnalysis};
pub use use_cases::ingestion::IngestionUseCase;
pub use use_cases::narrator::NarrateUseCase;
pub use use_cases::summarizer::summarize;
