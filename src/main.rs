use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use perch_api::api;
use perch_api::config::Config;
use perch_api::db::init_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,perch_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    Config::init();
    info!("Initialized configuration");

    // Initialize database and run migrations
    let db = Arc::new(init_database().await?);
    info!("Connected to database");

    // Start API server
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_api_server(db).await {
            error!("API server error: {}", e);
        }
    });

    // Handle shutdown signals
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down");
        }
        _ = api_handle => {
            error!("API server exited unexpectedly");
        }
    }

    info!("Perch API shutdown complete");
    Ok(())
}
