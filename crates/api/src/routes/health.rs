//! Liveness endpoint covering the database and the import directories.

use std::path::Path;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every check passes, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether uploads can be staged.
    pub upload_dir_ready: bool,
    /// Whether import reports can be written.
    pub log_dir_ready: bool,
}

/// A directory is ready when it exists (or can be created) and is not
/// read-only.
async fn dir_ready(dir: &Path) -> bool {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        tracing::warn!(error = %e, dir = %dir.display(), "Directory unavailable");
        return false;
    }
    match tokio::fs::metadata(dir).await {
        Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
        Err(e) => {
            tracing::warn!(error = %e, dir = %dir.display(), "Directory unreadable");
            false
        }
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = carbase_db::health_check(&state.pool).await.is_ok();
    let upload_dir_ready = dir_ready(&state.config.upload_dir).await;
    let log_dir_ready = dir_ready(&state.config.log_dir).await;

    let healthy = db_healthy && upload_dir_ready && log_dir_ready;
    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        upload_dir_ready,
        log_dir_ready,
    })
}

/// `/health`, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
