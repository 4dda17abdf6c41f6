use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Which object store holds evidence binaries (`local` or `s3`).
    pub storage_backend: &'static str,
    /// Largest accepted upload request, in bytes.
    pub max_upload_bytes: usize,
}

/// GET /health
///
/// Always answers 200 so a load balancer can tell a slow database from a
/// dead process.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = evidencias_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        storage_backend: state.config.storage.backend.name(),
        max_upload_bytes: state.config.max_upload_bytes,
    })
}

/// ```text
/// GET /health   -> health
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
