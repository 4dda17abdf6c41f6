//! Evidence file metadata model and DTOs.

use evidencias_core::files::FileKind;
use evidencias_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_files` table. The binary itself lives in the
/// object store under `storage_key`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventFile {
    pub id: DbId,
    pub event_id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: FileKind,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for recording an already-stored binary.
#[derive(Debug, Clone)]
pub struct CreateEventFile {
    pub event_id: DbId,
    pub kind: FileKind,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub storage_key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub uploaded_by: DbId,
}
