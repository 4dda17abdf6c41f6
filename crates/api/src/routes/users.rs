//! Route definitions for the `/users` resource.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// All routes require the `ADMIN` role (enforced by handler extractors).
///
/// ```text
/// GET   /                  -> list_users
/// POST  /                  -> create_user
/// PUT   /{id}              -> update_user
/// PATCH /{id}/role         -> change_role
/// PATCH /{id}/deactivate   -> deactivate_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", put(users::update_user))
        .route("/{id}/role", patch(users::change_role))
        .route("/{id}/deactivate", patch(users::deactivate_user))
}
