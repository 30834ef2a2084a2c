use super::{parse_json_body, string_field};
use crate::error::{service_error, validation_error, ApiResult};
use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use school_chat_common::ChatbotError;
use school_chat_core::{answer::INVALID_MESSAGE, ChatCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const CHAT_FAILED: &str = "Failed to process your message";

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

pub fn routes(core: Arc<ChatCore>) -> Router {
    Router::new().route("/chat", post(chat)).with_state(core)
}

/// Expects `{"message": "<question>"}`. The body is read as JSON regardless of
/// `Content-Type`; a body that is not JSON at all is an internal failure.
async fn chat(State(core): State<Arc<ChatCore>>, body: Bytes) -> ApiResult<Json<ChatResponse>> {
    let payload = parse_json_body(&body).map_err(|e| {
        service_error(CHAT_FAILED)(ChatbotError::Internal(format!("unreadable chat body: {}", e)))
    })?;
    let message = string_field(&payload, "message").ok_or_else(|| validation_error(INVALID_MESSAGE))?;

    let resolved = core
        .answers
        .resolve(message)
        .await
        .map_err(service_error(CHAT_FAILED))?;

    info!("Answered chat message via {:?}", resolved.source);
    Ok(Json(ChatResponse {
        response: resolved.text,
    }))
}
