//! courtbook server entry point.
//!
//! Loads configuration, selects the store, and starts the Axum HTTP server.

use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courtbook::api;
use courtbook::app_state::AppState;
use courtbook::config::{GatewayConfig, LogFormat};
use courtbook::domain::EventBus;
use courtbook::notify::spawn_promotion_notifier;
use courtbook::persistence::{MemoryStore, PostgresStore, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting courtbook");

    // Select store
    let store = if config.persistence_enabled {
        let store = PostgresStore::connect(&config)
            .await
            .context("connecting to PostgreSQL")?;
        store.migrate().await.context("running migrations")?;
        tracing::info!("using PostgreSQL store");
        StoreBackend::Postgres(store)
    } else {
        tracing::warn!("persistence disabled; using in-memory store");
        StoreBackend::Memory(MemoryStore::new())
    };

    // Build application state
    let event_bus = EventBus::new(config.event_bus_capacity);
    let _notifier = spawn_promotion_notifier(&event_bus);
    let app_state = AppState::new(store, event_bus, config.waitlist_skill_gating);
    tracing::info!(gating = ?config.waitlist_skill_gating, "waitlist skill gating");

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
