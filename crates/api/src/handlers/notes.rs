//! Handlers for event notes (`/events/{id}/notes`).
//!
//! Any authenticated user may add a note. Editing and deleting is open to
//! the note's author and to anyone who may edit the event.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use evidencias_core::audit::{action, entity};
use evidencias_core::notes::NoteInput;
use evidencias_core::roles::can_modify_note;
use evidencias_core::types::DbId;
use evidencias_db::models::note::EventNote;
use evidencias_db::repositories::EventNoteRepo;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_event, record_audit};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events/{id}/notes
///
/// Newest first.
pub async fn list_notes(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EventNote>>>> {
    load_event(&state, event_id).await?;
    let notes = EventNoteRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/events/{id}/notes
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<NoteInput>,
) -> AppResult<(StatusCode, Json<DataResponse<EventNote>>)> {
    load_event(&state, event_id).await?;

    let input = input.normalized();
    input.check()?;
    let note = EventNoteRepo::create(&state.pool, event_id, &input.text, auth.user_id).await?;

    record_audit(
        &state,
        auth.user_id,
        action::CREATE,
        entity::NOTE,
        note.id,
        json!({ "event_id": event_id }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// PUT /api/v1/events/{id}/notes/{note_id}
pub async fn update_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((event_id, note_id)): Path<(DbId, DbId)>,
    Json(input): Json<NoteInput>,
) -> AppResult<Json<DataResponse<EventNote>>> {
    load_modifiable_note(&state, &auth, event_id, note_id).await?;

    let input = input.normalized();
    input.check()?;
    let note = EventNoteRepo::update(&state.pool, event_id, note_id, &input.text)
        .await?
        .ok_or_else(|| AppError::not_found("EventNote", note_id))?;

    record_audit(
        &state,
        auth.user_id,
        action::UPDATE,
        entity::NOTE,
        note_id,
        json!({ "event_id": event_id }),
    )
    .await;

    Ok(Json(DataResponse { data: note }))
}

/// DELETE /api/v1/events/{id}/notes/{note_id}
pub async fn delete_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((event_id, note_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_modifiable_note(&state, &auth, event_id, note_id).await?;

    if !EventNoteRepo::delete(&state.pool, event_id, note_id).await? {
        return Err(AppError::not_found("EventNote", note_id));
    }

    record_audit(
        &state,
        auth.user_id,
        action::DELETE,
        entity::NOTE,
        note_id,
        json!({ "event_id": event_id }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_modifiable_note(
    state: &AppState,
    auth: &AuthUser,
    event_id: DbId,
    note_id: DbId,
) -> AppResult<EventNote> {
    let event = load_event(state, event_id).await?;
    let note = EventNoteRepo::find_by_id(&state.pool, event_id, note_id)
        .await?
        .ok_or_else(|| AppError::not_found("EventNote", note_id))?;

    if !can_modify_note(auth.role, auth.user_id, note.created_by, event.created_by) {
        return Err(AppError::forbidden(
            "Only the note's author, the event's creator or an admin may change this note",
        ));
    }
    Ok(note)
}
