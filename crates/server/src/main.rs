//! folio-sw server entry point.
//!
//! Loads configuration, opens the durable store, and serves the worker's
//! events as MCP tools on stdio. Logging goes to stderr to avoid interfering
//! with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use folio_client::{FetchConfig, HttpNetwork, Worker, WorkerConfig};
use folio_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(db_path = %config.db_path.display(), cache = %config.cache_name(), "starting folio-sw on stdio transport");

    let cache = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;
    let network = HttpNetwork::new(FetchConfig::from_app_config(&config)?)?;
    let worker = Worker::new(WorkerConfig::from_app_config(&config)?, cache, Arc::new(network));

    let handler = handler::FolioServer::new(Arc::new(worker));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
