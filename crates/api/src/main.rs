mod cache;
mod config;
mod error;
mod metrics;
mod routes;
mod ui;

use anyhow::Context;
use extract::{Extractor, Provider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("Failed to load server configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // One extractor per provider that has a key
    let mut extractors = HashMap::new();
    for provider in [Provider::Groq, Provider::OpenAi] {
        match Extractor::from_config(&config.detective_config(provider)) {
            Ok(extractor) => {
                info!(%provider, model = %extractor.describe(), "Provider ready");
                extractors.insert(provider, extractor);
            }
            Err(e) => warn!(%provider, error = %e, "Provider unavailable"),
        }
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, extractors));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context(format!("Failed to bind {}", bind_addr))?;

    info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
