use std::sync::Arc;

use serde::Serialize;

use crate::application::use_cases::ingestion::IngestionUseCase;
use crate::application::use_cases::narrator::NarrateUseCase;
use crate::application::use_cases::summarizer::summarize;
use crate::domain::error::{AppError, Result};
use crate::domain::file_format::FileFormat;
use crate::domain::narrative::Narrative;
use crate::domain::table::{SummaryReport, Table};

/// Preview and summary of one upload.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub preview: Table,
    pub report: SummaryReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryAnalysis {
    pub digest: Digest,
    pub story: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightAnalysis {
    pub digest: Digest,
    pub insights: Narrative,
    pub story: Narrative,
}

/// Parse, summarize and narrate an upload. Parsing and summarizing run on the
/// blocking pool; only the narrator call awaits the network.
pub struct AnalysisUseCase {
    ingestion: Arc<IngestionUseCase>,
    narrator: Arc<NarrateUseCase>,
}

impl AnalysisUseCase {
    pub fn new(ingestion: Arc<IngestionUseCase>, narrator: Arc<NarrateUseCase>) -> Self {
        Self {
            ingestion,
            narrator,
        }
    }

    pub async fn digest(&self, bytes: Vec<u8>, format: FileFormat) -> Result<Digest> {
        let ingestion = self.ingestion.clone();
        tokio::task::spawn_blocking(move || {
            let table = ingestion.parse_format(&bytes, format)?;
            let report = summarize(&table)?;
            Ok(Digest {
                preview: ingestion.preview(&table),
                report,
            })
        })
        .await
        .map_err(|e| AppError::Internal(format!("Summary task failed: {}", e)))?
    }

    /// One data story straight from the report.
    pub async fn story(&self, bytes: Vec<u8>, format: FileFormat) -> Result<StoryAnalysis> {
        let digest = self.digest(bytes, format).await?;
        let story = self.narrator.narrate(&digest.report.text()).await?;
        Ok(StoryAnalysis { digest, story })
    }

    /// Insights over the report, then a story told from the insights.
    pub async fn insights(&self, bytes: Vec<u8>, format: FileFormat) -> Result<InsightAnalysis> {
        let digest = self.digest(bytes, format).await?;
        let (insights, story) = self
            .narrator
            .insights_and_story(&digest.report.text())
            .await?;
        Ok(InsightAnalysis {
            digest,
            insights,
            story,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMConfig;
    use crate::infrastructure::llm_clients::testing::StubClient;

    fn analysis(client: Arc<StubClient>) -> AnalysisUseCase {
        AnalysisUseCase::new(
            Arc::new(IngestionUseCase::new(1)),
            Arc::new(NarrateUseCase::new(client, LLMConfig::default())),
        )
    }

    #[tokio::test]
    async fn test_digest_previews_and_summarizes() {
        let digest = analysis(Arc::new(StubClient::replying("unused")))
            .digest(b"a,b\n1,2\n3,\n".to_vec(), FileFormat::Csv)
            .await
            .unwrap();

        assert_eq!(digest.preview.row_count(), 1);
        assert_eq!(digest.report.rows, 2);
        assert_eq!(digest.report.missing_count("b"), Some(1));
    }

    #[tokio::test]
    async fn test_story_sends_report_text() {
        let client = Arc::new(StubClient::replying("Two rows, one gap."));
        let result = analysis(client.clone())
            .story(b"a,b\n1,2\n3,\n".to_vec(), FileFormat::Csv)
            .await
            .unwrap();

        assert_eq!(result.story, "Two rows, one gap.");
        assert!(client.calls()[0].user.contains("Shape: 2 rows × 2 columns"));
    }

    #[tokio::test]
    async fn test_parse_error_skips_narrator() {
        let client = Arc::new(StubClient::replying("unused"));
        let err = analysis(client.clone())
            .insights(b"garbage".to_vec(), FileFormat::Xlsx)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ParseError(_)));
        assert!(client.calls().is_empty());
    }
}
