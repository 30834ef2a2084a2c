use axum::{routing::get, Json, Router};
use serde_json::json;
use tracing::debug;

pub fn routes() -> Router {
    Router::new().route("/", get(health_check))
}

async fn health_check() -> Json<serde_json::Value> {
    debug!("Health check requested");

    Json(json!({
        "status": "healthy",
        "service": "school-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    }))
}
