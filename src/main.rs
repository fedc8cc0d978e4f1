//! parlord - a room-based chat dispatcher.
//!
//! A multi-threaded chat server: clients log in over TCP, create and join
//! rooms behind admission filters, and exchange messages that fan out as
//! JSON view updates.

mod config;
mod error;
mod handlers;
mod http;
mod metrics;
mod network;
mod notify;
mod state;
mod telemetry;
mod views;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::Hub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        listen = %config.listen.address,
        "Starting parlord"
    );

    // Create the Hub (shared state)
    let hub = Arc::new(Hub::new(&config));

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port;
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        info!("Metrics initialized");

        let server_info = hub.server_info.clone();
        tokio::spawn(async move {
            http::run_http_server(metrics_port, server_info).await;
        });
        info!(port = metrics_port, "Prometheus HTTP server started");
    }

    // Start the Gateway
    let gateway = Gateway::bind(config.listen.address, Arc::clone(&hub)).await?;

    gateway.run().await?;

    Ok(())
}
