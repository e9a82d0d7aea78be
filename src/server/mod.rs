//! HTTP API server exposing the latest cycle snapshot.
//!
//! Uses `axum` for routing with CORS support.
//!
//! - `GET /`: plain-text liveness line
//! - `GET /health`: JSON status
//! - `GET /api/spreads`: latest snapshot (ranked results, refresh times)
//! - `GET /api/history/:base`: spread samples for one base asset

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::core::snapshot::SnapshotReceiver;
use crate::core::symbols::normalize;
use crate::core::types::current_time_ms;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Latest published snapshot
    pub snapshots: SnapshotReceiver,
    /// Live operator alert switch (`/stop`, `/resume`)
    pub alerts_enabled: Arc<AtomicBool>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/spreads", get(spreads_handler))
        .route("/api/history/:base", get(history_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind `0.0.0.0:port` and serve until `shutdown` resolves.
pub async fn start_server<F>(state: AppState, port: u16, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("0.0.0.0:{}", port);
    info!(address = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, state, shutdown).await
}

/// GET /: liveness text
async fn index_handler() -> &'static str {
    "Spread monitor online"
}

/// GET /health: server status
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.snapshots.borrow().clone();
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": current_time_ms(),
        "cycle": snapshot.cycle,
        "pairs": snapshot.pair_count,
        "alerts_enabled": state.alerts_enabled.load(Ordering::SeqCst),
    }))
}

/// GET /api/spreads: latest snapshot
async fn spreads_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshots.borrow().clone();
    Json(&*snapshot).into_response()
}

/// GET /api/history/:base: samples for one asset, 404 when unknown
async fn history_handler(
    State(state): State<AppState>,
    Path(base): Path<String>,
) -> Response {
    let base = normalize(&base);
    let snapshot = state.snapshots.borrow().clone();

    match snapshot.history.samples(&base) {
        Some(samples) => Json(serde_json::json!({
            "base_asset": base,
            "samples": samples,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown base asset: {}", base) })),
        )
            .into_response(),
    }
}
