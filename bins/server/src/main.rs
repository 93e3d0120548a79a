//! localprice API server
//!
//! Main entry point for the localprice service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use localprice_api::{AppState, create_router};
use localprice_clients::ReqwestFetcher;
use localprice_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "localprice=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Create provider client
    let fetcher = ReqwestFetcher::new().context("failed to create HTTP client")?;
    info!(
        geo_url = %config.providers.geo_url,
        rates_url = %config.providers.rates_url,
        default_culture = %config.currency.default_culture,
        "Providers configured"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = AppState {
        fetcher: Arc::new(fetcher),
        config: Arc::new(config),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
