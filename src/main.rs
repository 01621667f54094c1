// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::historical_loader::HistoricalLoader;
use crate::application::live_feed::LiveFeedSubscriber;
use crate::domain::dashboard::DisplayBuffer;
use crate::domain::timestamp::DisplayClock;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_source::HttpTelemetrySource;
use crate::infrastructure::ws_transport::WebSocketTransport;
use crate::presentation::app_state::AppState;
use crate::presentation::broadcast_sink::BroadcastSink;
use crate::presentation::handlers::router;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_app_config()?;
    let clock = DisplayClock::new(config.display.timezone()?);

    // Presentation sink and the dashboard that feeds it
    let (events, _) = broadcast::channel(256);
    let sink = Arc::new(BroadcastSink::new(events.clone()));
    let buffer = DisplayBuffer::new(config.display.chart_capacity, config.display.table_capacity);
    let (dashboard, snapshots) = DashboardService::new(buffer, clock, sink);
    let (updates, updates_rx) = mpsc::channel(256);
    tokio::spawn(dashboard.run(updates_rx));

    // Live feed first, then the historical seed
    let transport = Arc::new(WebSocketTransport::new(config.api.stream_url()));
    let backoff = config.feed.reconnect_backoff();
    let subscriber = LiveFeedSubscriber::new(transport, backoff, updates.clone());
    tokio::spawn(async move {
        if let Err(e) = subscriber.run().await {
            tracing::error!("Live feed stopped: {:#}", e);
        }
    });

    let source = Arc::new(HttpTelemetrySource::new(&config.api)?);
    let loader = HistoricalLoader::new(source, config.display.chart_capacity);
    tokio::spawn(loader.seed_into(updates));

    let state = Arc::new(AppState { snapshots, events });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {:?}", config.server.bind))?;
    tracing::info!("Starting water-quality dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
