use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// The single knowledge document the chatbot answers from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDocument {
    pub content: String,
    pub last_updated: DateTime<Utc>,
}

impl KnowledgeDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            last_updated: Utc::now(),
        }
    }
}

// Where a chat answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Question failed the topic gate
    Redirect,
    /// External completion service
    Completion,
    /// Local keyword rules
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAnswer {
    pub text: String,
    pub source: AnswerSource,
}

impl ResolvedAnswer {
    pub fn new(text: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

// Error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatbotError {
    #[error("{0}")]
    Validation(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatbotError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatbotError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, ChatbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_serializes_camel_case() {
        let doc = KnowledgeDocument::new("Hello");
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["content"], "Hello");
        assert!(value["lastUpdated"].is_string());
        assert!(value.get("last_updated").is_none());
    }

    #[test]
    fn test_validation_error_displays_bare_message() {
        let error = ChatbotError::Validation("Content cannot be empty".to_string());
        assert_eq!(error.to_string(), "Content cannot be empty");
        assert!(error.is_validation());
        assert!(!ChatbotError::Internal("boom".to_string()).is_validation());
    }

    #[test]
    fn test_answer_source_wire_names() {
        let answer = ResolvedAnswer::new("hi", AnswerSource::RuleBased);
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["source"], "rule_based");
    }
}
