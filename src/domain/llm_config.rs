use serde::{Deserialize, Serialize};
use validator::Validate;

/// Connection settings for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct LLMConfig {
    #[validate(length(min = 1))]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub model: String,
    pub api_key: Option<String>,
    #[validate(range(min = 1, max = 128000))]
    pub max_tokens: Option<u32>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            max_tokens: Some(1024),
            temperature: Some(0.7),
        }
    }
}

impl LLMConfig {
    /// Joins `path` onto the base URL, tolerating a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_with_and_without_slash() {
        let mut config = LLMConfig::default();
        assert_eq!(
            config.endpoint("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        config.base_url = "http://localhost:1234/v1/".to_string();
        assert_eq!(
            config.endpoint("chat/completions"),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_validates() {
        assert!(LLMConfig::default().validate().is_ok());
    }
}
