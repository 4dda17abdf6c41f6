pub mod audit;
pub mod auth;
pub mod events;
pub mod health;
pub mod storage;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
///
/// /users                                           list, create (admin only)
/// /users/{id}                                      update
/// /users/{id}/role                                 change role (PATCH)
/// /users/{id}/deactivate                           deactivate (PATCH)
///
/// /events                                          list, create
/// /events/{id}                                     get, update, delete
/// /events/{id}/files                               list, upload (multipart)
/// /events/{id}/files/{file_id}                     delete
/// /events/{id}/attendance                          list, create
/// /events/{id}/attendance/bulk                     create many (POST)
/// /events/{id}/attendance/import                   CSV import (multipart)
/// /events/{id}/attendance/export/csv               CSV export
/// /events/{id}/attendance/{attendance_id}          delete
/// /events/{id}/notes                               list, create
/// /events/{id}/notes/{note_id}                     update, delete
///
/// /audit-logs                                      list (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/events", events::router())
        .nest("/audit-logs", audit::router())
}
