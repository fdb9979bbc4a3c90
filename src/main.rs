// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::layout_service::LayoutService;
use crate::infrastructure::config::load_builder_config;
use crate::infrastructure::http_repository::HttpDashboardRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_builder_config()?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpDashboardRepository::new(&config.api)?);

    // Create services (application layer)
    let layout_service = LayoutService::new(repository);

    // Create application state and router (presentation layer)
    let session_idle = Duration::from_secs(config.server.session_idle_secs);
    let state = Arc::new(AppState::new(layout_service, session_idle));
    let router = build_router(state.clone());

    // Sweep abandoned builder sessions
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(session_idle.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            state.sessions.evict_idle();
        }
    });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid server.bind address {}", config.server.bind))?;
    tracing::info!(
        "Starting dashboard-builder on {} (backend {})",
        addr,
        config.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
