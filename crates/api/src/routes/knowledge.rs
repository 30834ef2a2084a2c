use super::{parse_json_body, string_field};
use crate::error::{service_error, validation_error, ApiResult};
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use school_chat_common::{ChatbotError, KnowledgeDocument};
use school_chat_core::{storage::EMPTY_CONTENT_MESSAGE, ChatCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const CONTENT_REQUIRED: &str = "Content is required and must be a string";
const FETCH_FAILED: &str = "Failed to fetch school data";
const UPDATE_FAILED: &str = "Failed to update school data";
const UPDATE_SUCCEEDED: &str = "School data updated successfully";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub message: String,
    pub last_updated: DateTime<Utc>,
}

pub fn routes(core: Arc<ChatCore>) -> Router {
    Router::new()
        .route("/school-data", get(get_school_data))
        .route("/update-data", post(update_school_data))
        .with_state(core)
}

async fn get_school_data(State(core): State<Arc<ChatCore>>) -> ApiResult<Json<KnowledgeDocument>> {
    let document = core.store.get().await.map_err(service_error(FETCH_FAILED))?;
    Ok(Json(document))
}

/// Expects `{"content": "<document>"}`, read as JSON regardless of `Content-Type`.
async fn update_school_data(
    State(core): State<Arc<ChatCore>>,
    body: Bytes,
) -> ApiResult<Json<UpdateResponse>> {
    let payload = parse_json_body(&body).map_err(|e| {
        service_error(UPDATE_FAILED)(ChatbotError::Internal(format!("unreadable update body: {}", e)))
    })?;
    let content = string_field(&payload, "content")
        .ok_or_else(|| validation_error(CONTENT_REQUIRED))?
        .trim();
    if content.is_empty() {
        return Err(validation_error(EMPTY_CONTENT_MESSAGE));
    }

    let document = core
        .store
        .update(content)
        .await
        .map_err(service_error(UPDATE_FAILED))?;

    info!("School data updated at {}", document.last_updated);
    Ok(Json(UpdateResponse {
        message: UPDATE_SUCCEEDED.to_string(),
        last_updated: document.last_updated,
    }))
}
