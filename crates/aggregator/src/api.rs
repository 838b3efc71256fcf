//! HTTP API for aggregation runs, report read-back and ingestion

use aggregator_lib::{
    AggregationOrchestrator, AggregationWindow, AggregatorError, AggregatorMetrics, MemoryStore,
    MetricsStore, NamespaceRegistration, Sample,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub orchestrator: Arc<AggregationOrchestrator<MemoryStore>>,
    pub metrics: AggregatorMetrics,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>, orchestrator: Arc<AggregationOrchestrator<MemoryStore>>) -> Self {
        Self {
            store,
            orchestrator,
            metrics: AggregatorMetrics::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AggregationParams {
    pub account: String,
    pub aggregation_window: AggregationWindow,
}

#[derive(Debug, Serialize)]
struct FailedNamespace {
    namespace: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct PartialFailureBody {
    failed: Vec<FailedNamespace>,
}

fn error_response(error: AggregatorError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &error {
        AggregatorError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        AggregatorError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AggregatorError::ComputationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": error.to_string() })))
}

/// Trigger a recomputation of the account's report views
///
/// 204 on full success (an unknown account is a success with no work);
/// 500 with the failed namespaces on partial failure.
async fn aggregate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AggregationParams>,
) -> impl IntoResponse {
    match state
        .orchestrator
        .run(&params.account, params.aggregation_window)
        .await
    {
        Ok(outcome) if outcome.is_success() => StatusCode::NO_CONTENT.into_response(),
        Ok(outcome) => {
            let body = PartialFailureBody {
                failed: outcome
                    .failures
                    .into_iter()
                    .map(|f| FailedNamespace {
                        namespace: f.namespace,
                        error: f.error.to_string(),
                    })
                    .collect(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
        Err(error) => error_response(error).into_response(),
    }
}

/// Read back the current report view for one key
async fn get_report(
    State(state): State<Arc<AppState>>,
    Path((account, namespace, window)): Path<(String, String, String)>,
) -> impl IntoResponse {
    let window: AggregationWindow = match window.parse() {
        Ok(window) => window,
        Err(error) => return error_response(error).into_response(),
    };

    match state.store.report(&account, &namespace, window).await {
        Ok(Some(document)) => (StatusCode::OK, Json(document)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(error) => error_response(error).into_response(),
    }
}

/// Ingest a batch of raw samples
async fn ingest_samples(
    State(state): State<Arc<AppState>>,
    Json(samples): Json<Vec<Sample>>,
) -> impl IntoResponse {
    let count = samples.len() as u64;
    match state.store.insert_samples(samples).await {
        Ok(()) => {
            state.metrics.add_samples_ingested(count);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => error_response(error).into_response(),
    }
}

/// Register (or replace) an account's namespace set
async fn register_namespaces(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<NamespaceRegistration>,
) -> impl IntoResponse {
    match state.store.register_namespaces(registration).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error).into_response(),
    }
}

/// Liveness probe
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/aggregations", get(aggregate))
        .route("/reports/:account/:namespace/:window", get(get_report))
        .route("/samples", post(ingest_samples))
        .route("/namespaces", post(register_namespaces))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
