use crate::{
    completion::CompletionService,
    responder::RuleBasedResponder,
    storage::KnowledgeStore,
    topic_gate::{TopicGate, REDIRECT_MESSAGE},
};
use school_chat_common::{AnswerSource, ChatbotError, ResolvedAnswer, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const INVALID_MESSAGE: &str = "Message is required and must be a string";

pub const DEFAULT_MAX_TOKENS: u16 = 200;

pub fn build_prompt(knowledge_content: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant for Mar Baselios School. You can ONLY answer questions about this school \
using the information provided below. If the user asks about anything not mentioned in the school information, \
politely redirect them to ask about school-related topics.

SCHOOL INFORMATION:
{knowledge_content}

USER QUESTION: {question}

INSTRUCTIONS:
- Only use information from the school data provided above
- If the question cannot be answered with the provided information, say you don't have that specific \
information but offer to help with other school-related questions
- Be friendly, helpful, and professional
- Keep responses concise but informative
- If asked about topics not related to Mar Baselios School, politely redirect to school topics

Response:"
    )
}

/// Gate, then completion, then rule-based fallback.
pub struct AnswerService {
    store: Arc<dyn KnowledgeStore>,
    gate: TopicGate,
    responder: RuleBasedResponder,
    completion: Option<Arc<dyn CompletionService>>,
    max_tokens: u16,
}

impl AnswerService {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        completion: Option<Arc<dyn CompletionService>>,
    ) -> Self {
        Self {
            store,
            gate: TopicGate::new(),
            responder: RuleBasedResponder::new(),
            completion,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u16) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    pub async fn answer(&self, raw_question: &str) -> Result<String> {
        Ok(self.resolve(raw_question).await?.text)
    }

    /// Fails only on an empty question or an unreadable store; a failing
    /// completion service is always replaced by the local responder.
    pub async fn resolve(&self, raw_question: &str) -> Result<ResolvedAnswer> {
        let question = raw_question.trim();
        if question.is_empty() {
            return Err(ChatbotError::Validation(INVALID_MESSAGE.to_string()));
        }

        let document = self.store.get().await?;

        if !self.gate.in_scope(question, &document.content) {
            info!("Question rejected by topic gate");
            return Ok(ResolvedAnswer::new(REDIRECT_MESSAGE, AnswerSource::Redirect));
        }

        match self.try_completion(question, &document.content).await {
            Ok(text) => Ok(ResolvedAnswer::new(text, AnswerSource::Completion)),
            Err(e) => {
                warn!("Completion failed, falling back to keyword matching: {}", e);
                let text = self.responder.respond(&question.to_lowercase(), &document.content);
                Ok(ResolvedAnswer::new(text, AnswerSource::RuleBased))
            }
        }
    }

    async fn try_completion(&self, question: &str, knowledge_content: &str) -> Result<String> {
        let completion = self.completion.as_ref().ok_or_else(|| {
            ChatbotError::ExternalService("no completion service configured".to_string())
        })?;

        let prompt = build_prompt(knowledge_content, question);
        debug!("Sending {} character prompt to completion service", prompt.len());
        completion.complete(&prompt, self.max_tokens).await
    }
}
