use crate::CompletionConfig;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use school_chat_common::{ChatbotError, Result};
use std::time::Duration;
use tracing::{debug, info};

/// External text generation: one prompt in, generated text out.
/// Calls are stateless and attempted exactly once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u16) -> Result<String>;
}

pub struct OpenAiCompletionService {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiCompletionService {
    pub fn new(config: &CompletionConfig) -> Self {
        // Falls back to the OPENAI_API_KEY environment variable
        let openai_config = match &config.api_key {
            Some(key) => OpenAIConfig::new().with_api_key(key.clone()),
            None => OpenAIConfig::new(),
        };

        info!("Completion service using model {}", config.model);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, prompt: &str, max_tokens: u16) -> Result<String> {
        let message = ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(external)?,
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .max_tokens(max_tokens)
            .build()
            .map_err(external)?;

        let response = self.client.chat().create(request).await.map_err(external)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ChatbotError::ExternalService("completion returned no text".to_string()))
    }
}

fn external(err: impl std::fmt::Display) -> ChatbotError {
    ChatbotError::ExternalService(err.to_string())
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, prompt: &str, max_tokens: u16) -> Result<String> {
        debug!("Requesting completion from {} ({} max tokens)", self.model, max_tokens);

        match tokio::time::timeout(self.timeout, self.request(prompt, max_tokens)).await {
            Ok(result) => result,
            Err(_) => Err(ChatbotError::ExternalService(format!(
                "completion timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_takes_model_from_config() {
        let config = CompletionConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o".to_string(),
            ..CompletionConfig::default()
        };
        let service = OpenAiCompletionService::new(&config);
        assert_eq!(service.model(), "gpt-4o");
        assert_eq!(service.timeout, Duration::from_secs(config.timeout_secs));
    }

    #[test]
    fn test_external_wraps_message() {
        let err = external("connection refused");
        assert_eq!(err, ChatbotError::ExternalService("connection refused".to_string()));
    }
}
