use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::narrative::{Narrative, NarrativeKind};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_narrative;

/// Turns report text into prose through the configured text-generation service.
///
/// Every call is a fresh request: nothing is cached or retried.
pub struct NarrateUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl NarrateUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }

    pub async fn execute(&self, kind: NarrativeKind, input: &str) -> Result<Narrative> {
        let user_prompt = kind.user_prompt(input);

        let raw = self
            .llm_client
            .generate(&self.config, kind.system_prompt(), &user_prompt)
            .await
            .map_err(|err| {
                warn!(kind = ?kind, error = %err, "narration failed");
                err
            })?;

        let text = clean_narrative(&raw);
        info!(kind = ?kind, model = %self.config.model, chars = text.len(), "narration complete");
        Ok(Narrative::new(kind, text))
    }

    /// Data story written directly from the summary report.
    pub async fn narrate(&self, report_text: &str) -> Result<String> {
        Ok(self.execute(NarrativeKind::DataStory, report_text).await?.text)
    }

    /// Analyst insights over the report, then a story retold from those insights.
    pub async fn insights_and_story(&self, report_text: &str) -> Result<(Narrative, Narrative)> {
        let insights = self.execute(NarrativeKind::KeyInsights, report_text).await?;
        let story = self
            .execute(NarrativeKind::EngagingStory, &insights.text)
            .await?;
        Ok((insights, story))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::infrastructure::llm_clients::testing::StubClient;

    const REPORT: &str = "Shape: 2 rows × 2 columns";

    fn narrator(client: Arc<StubClient>) -> NarrateUseCase {
        NarrateUseCase::new(client, LLMConfig::default())
    }

    #[tokio::test]
    async fn test_narrate_embeds_report_and_persona() {
        let client = Arc::new(StubClient::replying("<think>hm</think>\nA tidy dataset."));
        let story = narrator(client.clone()).narrate(REPORT).await.unwrap();

        assert_eq!(story, "A tidy dataset.");
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "You are a helpful data analyst.");
        assert!(calls[0].user.contains(REPORT));
    }

    #[tokio::test]
    async fn test_insights_feed_the_story() {
        let client = Arc::new(StubClient::replying("Revenue peaks in March."));
        let (insights, story) = narrator(client.clone())
            .insights_and_story(REPORT)
            .await
            .unwrap();

        assert_eq!(insights.kind, NarrativeKind::KeyInsights);
        assert_eq!(story.kind, NarrativeKind::EngagingStory);

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].user.contains(REPORT));
        assert!(calls[1].system.contains("storyteller"));
        assert!(calls[1].user.contains("Revenue peaks in March."));
    }

    #[tokio::test]
    async fn test_failure_surfaces_once_without_retry() {
        let client = Arc::new(StubClient::failing("rate limited"));
        let err = narrator(client.clone()).narrate(REPORT).await.unwrap_err();

        assert!(matches!(err, AppError::NarratorError(ref msg) if msg == "rate limited"));
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_insights_failure_skips_story() {
        let client = Arc::new(StubClient::failing("offline"));
        assert!(narrator(client.clone())
            .insights_and_story(REPORT)
            .await
            .is_err());
        assert_eq!(client.calls().len(), 1);
    }
}
