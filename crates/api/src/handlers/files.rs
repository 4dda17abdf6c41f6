//! Handlers for event evidence files (`/events/{id}/files`).
//!
//! Uploads are multipart with one or more `files` fields. Each file is
//! stored and then recorded before the next one is read, so a failure part
//! way through leaves the earlier files in place and aborts the rest.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use evidencias_core::audit::{action, entity};
use evidencias_core::files::{public_url, storage_key, thumbnail_url, validate_upload, FileKind};
use evidencias_core::types::DbId;
use evidencias_db::models::event_file::{CreateEventFile, EventFile};
use evidencias_db::repositories::EventFileRepo;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_editable_event, load_event, record_audit};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the uploaded files.
const FILES_FIELD: &str = "files";

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListFilesParams {
    pub kind: Option<FileKind>,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub kind: FileKind,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{id}/files?kind=
///
/// Files of the event, newest first.
pub async fn list_files(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<ListFilesParams>,
) -> AppResult<Json<DataResponse<Vec<EventFile>>>> {
    load_event(&state, event_id).await?;
    let files = EventFileRepo::list_by_event(&state.pool, event_id, params.kind).await?;
    Ok(Json(DataResponse { data: files }))
}

/// POST /api/v1/events/{id}/files?kind=PHOTO|DOC
///
/// Store every `files` part in the kind's bucket and record one metadata
/// row per file. Photos also get a thumbnail URL.
pub async fn upload_files(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<EventFile>>>)> {
    let event = load_editable_event(&state, &auth, event_id).await?;
    let kind = params.kind;
    let buckets = state.buckets();
    let bucket = buckets.for_kind(kind);

    let mut created = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read '{filename}': {e}")))?;

        validate_upload(kind, &filename, &mime, data.len())?;

        let key = storage_key(event.id, &filename, &mime);
        let size = data.len() as i64;
        state.store.put(bucket, &key, data, &mime).await?;

        let url = public_url(&state.config.storage.public_url, bucket, &key);
        let input = CreateEventFile {
            event_id: event.id,
            kind,
            filename,
            mime,
            size,
            storage_key: key,
            thumbnail_url: kind.has_thumbnail().then(|| thumbnail_url(&url)),
            url,
            uploaded_by: auth.user_id,
        };

        match EventFileRepo::create(&state.pool, &input).await {
            Ok(file) => {
                tracing::debug!(event_id = %event.id, file_id = %file.id, "File stored");
                created.push(file);
            }
            Err(e) => {
                // The binary is already stored; try once to remove it.
                match state.store.delete(bucket, &input.storage_key).await {
                    Ok(()) => tracing::warn!(
                        error = %e,
                        key = %input.storage_key,
                        "File metadata insert failed, stored object removed"
                    ),
                    Err(cleanup) => tracing::warn!(
                        error = %e,
                        cleanup_error = %cleanup,
                        key = %input.storage_key,
                        "File metadata insert failed, stored object left behind"
                    ),
                }
                return Err(e.into());
            }
        }
    }

    if created.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No files uploaded. Expected one or more multipart '{FILES_FIELD}' fields"
        )));
    }

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        count = created.len(),
        %kind,
        "Files uploaded"
    );
    record_audit(
        &state,
        auth.user_id,
        action::UPLOAD,
        entity::FILE,
        event.id,
        json!({
            "kind": kind,
            "files": created.iter().map(|f| f.id).collect::<Vec<_>>(),
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// DELETE /api/v1/events/{id}/files/{file_id}
///
/// Remove the binary first; if that fails the row is kept so the delete can
/// be retried.
pub async fn delete_file(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((event_id, file_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_editable_event(&state, &auth, event_id).await?;

    let file = EventFileRepo::find_by_id(&state.pool, event_id, file_id)
        .await?
        .ok_or_else(|| AppError::not_found("EventFile", file_id))?;

    let buckets = state.buckets();
    state
        .store
        .delete(buckets.for_kind(file.kind), &file.storage_key)
        .await?;

    if !EventFileRepo::delete(&state.pool, event_id, file_id).await? {
        return Err(AppError::not_found("EventFile", file_id));
    }

    tracing::info!(user_id = %auth.user_id, event_id = %event_id, file_id = %file_id, "File deleted");
    record_audit(
        &state,
        auth.user_id,
        action::DELETE,
        entity::FILE,
        file_id,
        json!({ "event_id": event_id, "filename": file.filename }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
