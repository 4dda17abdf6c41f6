//! Handlers for attendance rolls (`/events/{id}/attendance`).

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use evidencias_core::attendance::{export_csv, export_filename, parse_csv, AttendanceInput};
use evidencias_core::audit::{action, entity};
use evidencias_core::error::CoreError;
use evidencias_core::types::DbId;
use evidencias_db::models::attendance::Attendance;
use evidencias_db::repositories::AttendanceRepo;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_editable_event, load_event, record_audit};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the CSV on import.
const CSV_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub imported: usize,
}

/// GET /api/v1/events/{id}/attendance
///
/// The roll, ordered by person name.
pub async fn list_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Attendance>>>> {
    load_event(&state, event_id).await?;
    let rows = AttendanceRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/events/{id}/attendance
pub async fn create_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<AttendanceInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Attendance>>)> {
    load_editable_event(&state, &auth, event_id).await?;

    let input = input.normalized();
    input.check()?;
    let row = AttendanceRepo::create(&state.pool, event_id, &input).await?;

    record_audit(
        &state,
        auth.user_id,
        action::CREATE,
        entity::ATTENDANCE,
        row.id,
        json!({ "event_id": event_id, "person_name": row.person_name }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// POST /api/v1/events/{id}/attendance/bulk
///
/// Insert many records at once. Either all are created or none.
pub async fn create_attendance_bulk(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(inputs): Json<Vec<AttendanceInput>>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Attendance>>>)> {
    load_editable_event(&state, &auth, event_id).await?;

    if inputs.is_empty() {
        return Err(AppError::BadRequest("No attendance records supplied".into()));
    }
    let inputs = inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let input = input.normalized();
            input
                .check()
                .map_err(|e| CoreError::Validation(format!("Record {}: {e}", i + 1)))?;
            Ok(input)
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let rows = AttendanceRepo::create_many(&state.pool, event_id, &inputs).await?;

    tracing::info!(user_id = %auth.user_id, event_id = %event_id, count = rows.len(), "Attendance created");
    record_audit(
        &state,
        auth.user_id,
        action::CREATE,
        entity::ATTENDANCE,
        event_id,
        json!({ "count": rows.len() }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: rows })))
}

/// POST /api/v1/events/{id}/attendance/import
///
/// Multipart upload with a `file` field holding a CSV roll. The whole file
/// is validated before anything is written.
pub async fn import_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportResult>>> {
    load_editable_event(&state, &auth, event_id).await?;

    let mut csv = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(CSV_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            csv = Some(data);
            break;
        }
    }
    let csv = csv.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{CSV_FIELD}'"))
    })?;

    let records = parse_csv(&csv)?;
    if records.is_empty() {
        return Err(AppError::BadRequest("CSV contains no attendance rows".into()));
    }
    let rows = AttendanceRepo::create_many(&state.pool, event_id, &records).await?;

    tracing::info!(user_id = %auth.user_id, event_id = %event_id, count = rows.len(), "Attendance imported");
    record_audit(
        &state,
        auth.user_id,
        action::IMPORT,
        entity::ATTENDANCE,
        event_id,
        json!({ "count": rows.len() }),
    )
    .await;

    Ok(Json(DataResponse {
        data: ImportResult {
            imported: rows.len(),
        },
    }))
}

/// GET /api/v1/events/{id}/attendance/export/csv
///
/// The roll as a UTF-8 CSV download.
pub async fn export_attendance_csv(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Response> {
    let event = load_event(&state, event_id).await?;
    let rows = AttendanceRepo::list_by_event(&state.pool, event_id).await?;
    let csv = export_csv(&rows);

    // Non-ASCII titles are sent as raw UTF-8 (obs-text); `from_str` would reject them.
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&event.title));
    let disposition = HeaderValue::from_bytes(disposition.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Invalid export filename: {e}")))?;

    record_audit(
        &state,
        auth.user_id,
        action::EXPORT_CSV,
        entity::ATTENDANCE,
        event_id,
        json!({ "rows": rows.len() }),
    )
    .await;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(csv))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))
}

/// DELETE /api/v1/events/{id}/attendance/{attendance_id}
pub async fn delete_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((event_id, attendance_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_editable_event(&state, &auth, event_id).await?;

    if !AttendanceRepo::delete(&state.pool, event_id, attendance_id).await? {
        return Err(AppError::not_found("Attendance", attendance_id));
    }

    record_audit(
        &state,
        auth.user_id,
        action::DELETE,
        entity::ATTENDANCE,
        attendance_id,
        json!({ "event_id": event_id }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
