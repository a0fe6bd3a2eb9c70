//! Météo-Blob - Backend Server
//!
//! Polls a temperature/humidity sensor API and publishes the dashboard
//! state: live card with trend arrows and mood, history charts, gauge.

use std::{net::SocketAddr, sync::Arc};

use meteo_blob::{
    config::Config,
    create_app,
    external::SensorApiClient,
    services::poller::{Poller, PollerSettings},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meteo_blob=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Météo-Blob Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Sensor API: {}", config.sensor_api.base_url);

    // Start the polling loop
    let client = SensorApiClient::new(&config.sensor_api, config.history_range())?;
    let (poller, snapshots) = Poller::new(client, PollerSettings::from_config(&config)?);
    let poller = poller.spawn();

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        snapshots,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.stop().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
