use serde::{Deserialize, Serialize};

/// Which narrative the Narrator is asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    /// Short human-style story written straight from the summary report.
    DataStory,
    /// Analyst's observations on the summary report.
    KeyInsights,
    /// Storyteller's retelling of previously generated insights.
    EngagingStory,
}

impl NarrativeKind {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            NarrativeKind::DataStory => "You are a helpful data analyst.",
            NarrativeKind::KeyInsights => {
                "You are a data analyst providing insights about the given dataset."
            }
            NarrativeKind::EngagingStory => {
                "You are a professional storyteller who makes data insights engaging and easy to understand."
            }
        }
    }

    /// User message with `input` embedded verbatim.
    pub fn user_prompt(&self, input: &str) -> String {
        match self {
            NarrativeKind::DataStory => format!(
                "Here is a dataset analysis:\n\n{}\n\nWrite a short, human-style data story with key findings.",
                input
            ),
            NarrativeKind::KeyInsights => format!(
                "Given the following dataset summary, provide key insights and observations:\n\
                 {}\n\n\
                 Please provide:\n\
                 1. Key statistics\n\
                 2. Interesting patterns\n\
                 3. Potential outliers\n\
                 4. Business recommendations",
                input
            ),
            NarrativeKind::EngagingStory => format!(
                "Convert the following data insights into an engaging, easy-to-understand narrative story:\n\
                 {}\n\n\
                 The story should:\n\
                 1. Start with an attention-grabbing introduction\n\
                 2. Explain the key findings in a narrative format\n\
                 3. Provide context and meaning to the numbers\n\
                 4. End with actionable recommendations",
                input
            ),
        }
    }
}

/// Text returned by the Narrator for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narrative {
    pub kind: NarrativeKind,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Narrative {
    pub fn new(kind: NarrativeKind, text: String) -> Self {
        Self {
            kind,
            text,
            created_at: chrono::Utc::now(),
        }
    }
}
