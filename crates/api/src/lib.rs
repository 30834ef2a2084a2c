pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod settings;

use axum::{extract::DefaultBodyLimit, Router};
use middleware::{cors_layer, request_id_middleware, request_logging_middleware};
use routes::create_routes;
use school_chat_core::ChatCore;
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub use server::ApiServer;
pub use settings::Settings;

// Re-export core crates
pub use school_chat_common;
pub use school_chat_core;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Directory holding the chat and editor pages.
    pub static_dir: String,
    pub max_request_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            cors_origins: vec!["*".to_string()],
            static_dir: "web".to_string(),
            max_request_size: 1024 * 1024, // 1MB
        }
    }
}

/// JSON endpoints plus the static chat and editor pages.
pub fn create_app(core: Arc<ChatCore>, config: &ApiConfig) -> Router {
    let static_dir = PathBuf::from(&config.static_dir);

    Router::new()
        .merge(create_routes(core))
        .route_service("/editor", ServeFile::new(static_dir.join("editor.html")))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(DefaultBodyLimit::max(config.max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(axum::middleware::from_fn(request_logging_middleware)),
        )
}
