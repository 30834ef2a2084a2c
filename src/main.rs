use anyhow::{Context, Result};
use school_chat_api::{ApiServer, Settings};
use school_chat_core::ChatCore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "school_chat=debug,school_chat_api=debug,school_chat_core=debug,tower_http=debug,axum=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mar Baselios school chatbot...");

    let settings = Settings::load().context("Failed to load settings")?;

    let core = Arc::new(ChatCore::new(&settings.core_config()));
    let server = ApiServer::new(settings.api.clone(), core);

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
