pub mod answer;
pub mod completion;
pub mod responder;
pub mod storage;
pub mod topic_gate;

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

pub use answer::AnswerService;
pub use completion::{CompletionService, OpenAiCompletionService};
pub use responder::RuleBasedResponder;
pub use storage::{InMemoryKnowledgeStore, KnowledgeStore};
pub use topic_gate::TopicGate;

/// Services shared by every request handler.
pub struct ChatCore {
    pub store: Arc<dyn KnowledgeStore>,
    pub answers: Arc<AnswerService>,
}

impl ChatCore {
    pub fn new(config: &CoreConfig) -> Self {
        let store: Arc<dyn KnowledgeStore> = Arc::new(InMemoryKnowledgeStore::new());

        let completion: Option<Arc<dyn CompletionService>> = match config.completion.unavailable_reason() {
            None => Some(Arc::new(OpenAiCompletionService::new(&config.completion))),
            Some(reason) => {
                warn!("{}; answering with the rule-based responder only", reason);
                None
            }
        };

        Self::with_parts(store, completion, config.completion.max_tokens)
    }

    pub fn with_parts(
        store: Arc<dyn KnowledgeStore>,
        completion: Option<Arc<dyn CompletionService>>,
        max_tokens: u16,
    ) -> Self {
        let answers = AnswerService::new(store.clone(), completion).with_max_tokens(max_tokens);
        info!(
            "Chat core ready (completion backend: {})",
            if answers.has_completion() { "enabled" } else { "disabled" }
        );

        Self {
            store,
            answers: Arc::new(answers),
        }
    }

    /// In-memory store with the default document and no completion backend.
    pub fn offline() -> Self {
        Self::with_parts(
            Arc::new(InMemoryKnowledgeStore::new()),
            None,
            answer::DEFAULT_MAX_TOKENS,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u16,
    pub timeout_secs: u64,
}

pub const COMPLETION_DISABLED: &str = "Completion backend disabled in configuration";
pub const NO_API_KEY: &str = "No OpenAI API key configured";

impl CompletionConfig {
    /// Needs `enabled` plus an explicit key or OPENAI_API_KEY in the environment.
    pub fn is_available(&self) -> bool {
        self.unavailable_reason().is_none()
    }

    /// Why no completion backend will be built, or `None` when one will.
    pub fn unavailable_reason(&self) -> Option<&'static str> {
        if !self.enabled {
            return Some(COMPLETION_DISABLED);
        }
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            || std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty());
        if has_key {
            None
        } else {
            Some(NO_API_KEY)
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: answer::DEFAULT_MAX_TOKENS,
            timeout_secs: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_config_defaults() {
        let config = CompletionConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.timeout_secs, 20);
    }

    #[test]
    fn test_disabled_completion_is_unavailable() {
        let config = CompletionConfig {
            enabled: false,
            api_key: Some("sk-test".to_string()),
            ..CompletionConfig::default()
        };
        assert!(!config.is_available());

        let config = CompletionConfig {
            api_key: Some("sk-test".to_string()),
            ..CompletionConfig::default()
        };
        assert!(config.is_available());
    }

    #[test]
    fn test_unavailable_reason_names_the_failing_condition() {
        let disabled = CompletionConfig {
            enabled: false,
            api_key: Some("sk-test".to_string()),
            ..CompletionConfig::default()
        };
        assert_eq!(disabled.unavailable_reason(), Some(COMPLETION_DISABLED));

        let keyed = CompletionConfig {
            api_key: Some("sk-test".to_string()),
            ..CompletionConfig::default()
        };
        assert_eq!(keyed.unavailable_reason(), None);

        // OPENAI_API_KEY may be set in the environment, so only check the key branch when it is not
        if std::env::var("OPENAI_API_KEY").map_or(true, |k| k.is_empty()) {
            let keyless = CompletionConfig {
                api_key: Some(String::new()),
                ..CompletionConfig::default()
            };
            assert_eq!(keyless.unavailable_reason(), Some(NO_API_KEY));
        }
    }

    #[tokio::test]
    async fn test_offline_core_answers_from_rules() {
        let core = ChatCore::offline();
        assert!(!core.answers.has_completion());

        let answer = core.answers.answer("What are the school timings?").await.unwrap();
        assert_eq!(answer, "Our school timings are from 8:00 AM to 3:00 PM, Monday through Friday.");
    }

    #[tokio::test]
    async fn test_core_shares_store_with_answer_service() {
        let core = ChatCore::offline();
        core.store.update("Only vision statements live here.").await.unwrap();

        let answer = core.answers.answer("What is the school's vision?").await.unwrap();
        assert!(answer.starts_with("Our school was founded with the vision"));
    }
}
