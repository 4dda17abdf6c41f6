//! Route definitions for `/events` and the evidence nested under each event.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{attendance, events, files, notes};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                                  -> list_events (?type, status, search, start_date, end_date)
/// POST   /                                  -> create_event
/// GET    /{id}                              -> get_event
/// PUT    /{id}                              -> update_event
/// DELETE /{id}                              -> delete_event (admin)
///
/// GET    /{id}/files                        -> list_files (?kind)
/// POST   /{id}/files                        -> upload_files (?kind, multipart `files`)
/// DELETE /{id}/files/{file_id}              -> delete_file
///
/// GET    /{id}/attendance                   -> list_attendance
/// POST   /{id}/attendance                   -> create_attendance
/// POST   /{id}/attendance/bulk              -> create_attendance_bulk
/// POST   /{id}/attendance/import            -> import_attendance (multipart `file`)
/// GET    /{id}/attendance/export/csv        -> export_attendance_csv
/// DELETE /{id}/attendance/{attendance_id}   -> delete_attendance
///
/// GET    /{id}/notes                        -> list_notes
/// POST   /{id}/notes                        -> create_note
/// PUT    /{id}/notes/{note_id}              -> update_note
/// DELETE /{id}/notes/{note_id}              -> delete_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Files
        .route(
            "/{id}/files",
            get(files::list_files).post(files::upload_files),
        )
        .route("/{id}/files/{file_id}", delete(files::delete_file))
        // Attendance
        .route(
            "/{id}/attendance",
            get(attendance::list_attendance).post(attendance::create_attendance),
        )
        .route(
            "/{id}/attendance/bulk",
            post(attendance::create_attendance_bulk),
        )
        .route(
            "/{id}/attendance/import",
            post(attendance::import_attendance),
        )
        .route(
            "/{id}/attendance/export/csv",
            get(attendance::export_attendance_csv),
        )
        .route(
            "/{id}/attendance/{attendance_id}",
            delete(attendance::delete_attendance),
        )
        // Notes
        .route(
            "/{id}/notes",
            get(notes::list_notes).post(notes::create_note),
        )
        .route(
            "/{id}/notes/{note_id}",
            put(notes::update_note).delete(notes::delete_note),
        )
}
