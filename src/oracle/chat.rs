//! OpenAI chat-based oracle implementation.

use super::{Classification, Classifier, EpisodeFormat, RelevanceOracle};
use crate::config::{OracleSettings, Prompts};
use crate::error::{Result, UtdragError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Chat-completion oracle for both classification and relevance ranking.
pub struct ChatOracle {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    prompts: Prompts,
}

impl ChatOracle {
    /// Create a new oracle from settings and prompt templates.
    pub fn new(settings: &OracleSettings, prompts: Prompts) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            prompts,
        }
    }

    /// Run one chat completion and return the assistant text.
    async fn complete(&self, system: String, user: String) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| UtdragError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| UtdragError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(1.0)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| UtdragError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| UtdragError::OracleUnavailable(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}

/// Extract a classification from the classifier's raw answer.
///
/// The reply is expected to be a JSON object with `type` and `topic` keys,
/// possibly wrapped in prose or markdown fences. Anything unusable falls
/// back to the unknown sentinels.
fn parse_classification(raw: &str) -> Classification {
    let json_start = raw.find('{');
    let json_end = raw.rfind('}');

    let json_str = match (json_start, json_end) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw,
    };

    let parsed: serde_json::Value = match serde_json::from_str(json_str) {
        Ok(value) => value,
        Err(e) => {
            warn!("Classifier reply was not valid JSON: {}", e);
            return Classification::unknown();
        }
    };

    let format = parsed["type"]
        .as_str()
        .map(EpisodeFormat::parse_lenient)
        .unwrap_or(EpisodeFormat::Unknown);

    let topic = parsed["topic"]
        .as_str()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    Classification { format, topic }
}

#[async_trait]
impl Classifier for ChatOracle {
    async fn classify(&self, excerpt: &str) -> Result<Classification> {
        let mut vars = HashMap::new();
        vars.insert("excerpt".to_string(), excerpt.to_string());

        let system = self
            .prompts
            .render_with_custom(&self.prompts.classify.system, &vars);
        let user = self
            .prompts
            .render_with_custom(&self.prompts.classify.user, &vars);

        let content = self.complete(system, user).await?;
        debug!(
            "Classifier reply: {}",
            &content[..content.len().min(200)]
        );

        Ok(parse_classification(&content))
    }
}

#[async_trait]
impl RelevanceOracle for ChatOracle {
    async fn rank(&self, block_text: &str, topic: &str, format: EpisodeFormat) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("block".to_string(), block_text.to_string());
        vars.insert("topic".to_string(), topic.to_string());
        vars.insert("format".to_string(), format.to_string());

        let system = self
            .prompts
            .render_with_custom(&self.prompts.rank.system, &vars);
        let user = self
            .prompts
            .render_with_custom(&self.prompts.rank.user, &vars);

        self.complete(system, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classification_clean_json() {
        let c = parse_classification(r#"{"type": "interview", "topic": "startup funding"}"#);
        assert_eq!(c.format, EpisodeFormat::Interview);
        assert_eq!(c.topic, "startup funding");
    }

    #[test]
    fn test_parse_classification_with_prose() {
        let raw = "Here is my analysis:\n```json\n{\"type\": \"solo\", \"topic\": \"running\"}\n```\nDone.";
        let c = parse_classification(raw);
        assert_eq!(c.format, EpisodeFormat::Solo);
        assert_eq!(c.topic, "running");
    }

    #[test]
    fn test_parse_classification_missing_keys() {
        let c = parse_classification(r#"{"topic": "history of tea"}"#);
        assert_eq!(c.format, EpisodeFormat::Unknown);
        assert_eq!(c.topic, "history of tea");

        let c = parse_classification(r#"{"type": "talk"}"#);
        assert_eq!(c.format, EpisodeFormat::Talk);
        assert_eq!(c.topic, "unknown");
    }

    #[test]
    fn test_parse_classification_garbage() {
        let c = parse_classification("I could not determine the format.");
        assert_eq!(c.format, EpisodeFormat::Unknown);
        assert_eq!(c.topic, "unknown");
    }

    #[test]
    fn test_parse_classification_unrecognized_type() {
        let c = parse_classification(r#"{"type": "panel", "topic": "AI"}"#);
        assert_eq!(c.format, EpisodeFormat::Unknown);
        assert_eq!(c.topic, "AI");
    }
}
