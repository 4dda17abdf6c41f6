//! Handlers for the `/events` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use evidencias_core::audit::{action, entity};
use evidencias_core::event::{EventFilter, EventInput, EventPatch};
use evidencias_core::roles::can_delete_event;
use evidencias_core::types::DbId;
use evidencias_db::models::event::Event;
use evidencias_db::repositories::{EventFileRepo, EventRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_editable_event, load_event, record_audit};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events?type=&status=&search=&start_date=&end_date=
///
/// Matching events, most recent `start_at` first.
pub async fn list_events(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
///
/// Any authenticated user may create an event; they become its creator.
pub async fn create_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let input = input.normalized();
    input.check()?;

    let event = EventRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(user_id = %auth.user_id, event_id = %event.id, "Event created");
    record_audit(
        &state,
        auth.user_id,
        action::CREATE,
        entity::EVENT,
        event.id,
        json!({ "title": event.title, "type": event.event_type }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = load_event(&state, id).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
///
/// Partial update by the creator or an admin. Absent fields are unchanged;
/// an empty string clears `location`, `audience` or `description`.
pub async fn update_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<EventPatch>,
) -> AppResult<Json<DataResponse<Event>>> {
    let current = load_editable_event(&state, &auth, id).await?;

    let patch = patch.normalized();
    patch.check(current.start_at, current.end_at)?;
    if patch.is_empty() {
        return Ok(Json(DataResponse { data: current }));
    }

    let event = EventRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;

    tracing::info!(user_id = %auth.user_id, event_id = %id, "Event updated");
    record_audit(
        &state,
        auth.user_id,
        action::UPDATE,
        entity::EVENT,
        id,
        serde_json::to_value(&patch).unwrap_or_default(),
    )
    .await;

    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
///
/// Admin only. Files, attendance and notes go with the event; stored
/// binaries are removed afterwards on a best-effort basis.
pub async fn delete_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !can_delete_event(auth.role) {
        return Err(AppError::forbidden("Only administrators may delete events"));
    }

    let event = load_event(&state, id).await?;
    let files = EventFileRepo::list_by_event(&state.pool, id, None).await?;

    if !EventRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Event", id));
    }

    let buckets = state.buckets();
    for file in &files {
        let bucket = buckets.for_kind(file.kind);
        if let Err(e) = state.store.delete(bucket, &file.storage_key).await {
            tracing::warn!(
                error = %e,
                bucket,
                key = %file.storage_key,
                "Failed to remove stored file of deleted event"
            );
        }
    }

    tracing::info!(user_id = %auth.user_id, event_id = %id, files = files.len(), "Event deleted");
    record_audit(
        &state,
        auth.user_id,
        action::DELETE,
        entity::EVENT,
        id,
        json!({ "title": event.title }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
