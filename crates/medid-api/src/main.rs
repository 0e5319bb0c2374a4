//! # medid-api: Binary Entry Point
//!
//! Parses configuration, installs tracing and the Prometheus recorder, wires
//! the in-memory service to the notification dispatcher, and serves.

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use medid_api::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing Prometheus recorder")?;

    let state = AppState::in_memory(
        config.service_config(),
        config.auth_config(),
        config.notification_buffer,
    )
    .with_metrics(metrics);

    if !state.auth.is_enforced() {
        tracing::warn!("no auth secret configured: bearer tokens need only a principal id");
    }
    tracing::info!(
        proof_mode = %config.proof_mode,
        store_timeout_ms = config.store_timeout_ms,
        max_verify_bytes = config.max_verify_bytes,
        "service configured"
    );

    let app = medid_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("medid API listening on {}", addr);

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
