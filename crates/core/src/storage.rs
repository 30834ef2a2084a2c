use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use school_chat_common::{ChatbotError, KnowledgeDocument, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Built-in school description loaded at process start.
pub const DEFAULT_CONTENT: &str = include_str!("default_content.md");

pub const EMPTY_CONTENT_MESSAGE: &str = "Content cannot be empty";

/// Holder of the single knowledge document.
///
/// Implementations replace the document wholesale on update. Readers must
/// observe either the previous or the new document, never a mix of both.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn get(&self) -> Result<KnowledgeDocument>;

    /// Replaces the content with the trimmed text and stamps the update time.
    /// Empty or whitespace-only text is rejected and leaves the store untouched.
    async fn update(&self, content: &str) -> Result<KnowledgeDocument>;
}

/// Non-durable store backed by an atomically swapped `Arc`.
/// A restart reverts to whatever content it was created with.
pub struct InMemoryKnowledgeStore {
    current: ArcSwap<KnowledgeDocument>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::with_content(DEFAULT_CONTENT.trim())
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            current: ArcSwap::from_pointee(KnowledgeDocument::new(content)),
        }
    }
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

// lastUpdated must strictly increase even when the clock has not moved
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn get(&self) -> Result<KnowledgeDocument> {
        let document = self.current.load();
        debug!("Loaded knowledge document ({} bytes)", document.content.len());
        Ok(document.as_ref().clone())
    }

    async fn update(&self, content: &str) -> Result<KnowledgeDocument> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatbotError::Validation(EMPTY_CONTENT_MESSAGE.to_string()));
        }

        let mut installed: Option<Arc<KnowledgeDocument>> = None;
        self.current.rcu(|current| {
            let document = Arc::new(KnowledgeDocument {
                content: content.to_string(),
                last_updated: next_timestamp(current.last_updated),
            });
            installed = Some(document.clone());
            document
        });

        let document = installed
            .ok_or_else(|| ChatbotError::Internal("knowledge document swap did not run".to_string()))?;

        info!(
            "Knowledge document replaced ({} bytes, last updated {})",
            document.content.len(),
            document.last_updated
        );
        Ok(document.as_ref().clone())
    }
}
