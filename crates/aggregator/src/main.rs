//! Usage Aggregator - per-namespace usage report recomputation service
//!
//! Serves the aggregation trigger, report read-back and ingestion
//! endpoints over an in-memory store.

use std::sync::Arc;

use aggregator::{api, config::AggregatorConfig};
use aggregator_lib::{AggregationOrchestrator, MemoryStore, StoreReportUpdater};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AggregatorConfig::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.pretty_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    }

    info!(api_port = config.api_port, "Starting usage-aggregator");

    let store = Arc::new(MemoryStore::new());
    let updater = Arc::new(StoreReportUpdater::new(store.clone()));
    let orchestrator = Arc::new(AggregationOrchestrator::new(store.clone(), updater));

    let app_state = Arc::new(api::AppState::new(store, orchestrator));

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
