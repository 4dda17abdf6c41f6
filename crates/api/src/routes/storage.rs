//! Public object routes (root level, not under `/api/v1`).

use axum::routing::get;
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// ```text
/// GET /storage/{bucket}/{*key}   -> serve_object (?width, height)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/storage/{bucket}/{*key}", get(storage::serve_object))
}
