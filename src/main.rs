//! person-extender server.
//!
//! Reads `.env` (if present), then the YAML config named by `CONFIG_PATH`
//! (default `config/local.yaml`); see `config.rs` for env overrides.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use person_extender::{build_router, logging, AppState, Config, HttpEnricher, PgPersonStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    logging::init(config.env);

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "server failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(env = ?config.env, "app started");
    tracing::debug!(?config, "configuration loaded");

    let store = PgPersonStore::connect(&config.postgres)
        .await
        .context("failed to init storage")?;
    tracing::info!("storage initialized");

    let http = reqwest::Client::builder()
        .build()
        .context("failed to create HTTP client")?;
    let enricher = HttpEnricher::new(http, &config.enrichment);

    let state = AppState::new(Arc::new(store), Arc::new(enricher));
    let app = build_router(state, config.http_server.timeout());

    let listener = TcpListener::bind(&config.http_server.address)
        .await
        .with_context(|| format!("failed to bind to {}", config.http_server.address))?;
    tracing::info!(address = %config.http_server.address, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
