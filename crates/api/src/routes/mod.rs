pub mod chat;
pub mod health;
pub mod knowledge;

use axum::{body::Bytes, Router};
use school_chat_core::ChatCore;
use serde_json::Value;
use std::sync::Arc;

pub fn create_routes(core: Arc<ChatCore>) -> Router {
    Router::new()
        // Health check routes
        .nest("/health", health::routes())
        // Chatbot
        .merge(chat::routes(core.clone()))
        // Knowledge document read/replace
        .merge(knowledge::routes(core))
}

/// Parses a request body as JSON whatever its `Content-Type` says.
pub(crate) fn parse_json_body(body: &Bytes) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(body)
}

/// The named field when it holds a non-empty string; missing, null and
/// non-string values all come back as `None`.
pub(crate) fn string_field<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
