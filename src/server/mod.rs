pub mod api;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use crate::data::SharedHistory;
use crate::error::{Result, TrackerError};
use crate::time::CivilZone;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub history: SharedHistory,
    pub zone: CivilZone,
    pub results_limit: usize,
}

pub fn router(state: AppState) -> Router {
    // The dashboard is served from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/results", get(api::results_handler))
        .route("/api/stats", get(api::stats_handler))
        .route("/api/hourly-stats", get(api::hourly_stats_handler))
        .route("/api/health", get(api::health_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the read API until `shutdown` flips
pub async fn serve(state: AppState, port: u16, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TrackerError::InternalError(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/results");
    tracing::info!("  GET /api/stats");
    tracing::info!("  GET /api/hourly-stats?date=YYYY-MM-DD");
    tracing::info!("  GET /api/health");
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while shutdown.changed().await.is_ok() {
                if *shutdown.borrow() {
                    break;
                }
            }
        })
        .await
        .map_err(|e| TrackerError::InternalError(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}
