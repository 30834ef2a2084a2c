use crate::{create_app, ApiConfig};
use axum::Router;
use school_chat_core::ChatCore;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

pub struct ApiServer {
    config: ApiConfig,
    core: Arc<ChatCore>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, core: Arc<ChatCore>) -> Self {
        Self { config, core }
    }

    pub fn router(&self) -> Router {
        create_app(self.core.clone(), &self.config)
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = self.router();
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!("CORS origins: {:?}", self.config.cors_origins);
        info!("Serving static pages from {}", self.config.static_dir);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    pub fn get_config(&self) -> &ApiConfig {
        &self.config
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::get_request;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_server_creation() {
        let server = ApiServer::new(ApiConfig::default(), Arc::new(ChatCore::offline()));
        assert_eq!(server.get_config().port, 8081);
    }

    #[tokio::test]
    async fn test_router_serves_school_data() {
        let server = ApiServer::new(ApiConfig::default(), Arc::new(ChatCore::offline()));
        let response = server.router().oneshot(get_request("/school-data")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
