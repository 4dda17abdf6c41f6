//! Repository for the `event_files` table.

use evidencias_core::files::FileKind;
use evidencias_core::types::DbId;
use sqlx::PgPool;

use crate::models::event_file::{CreateEventFile, EventFile};

const COLUMNS: &str = "id, event_id, kind, filename, mime, size, storage_key, url, \
                        thumbnail_url, uploaded_by, created_at";

/// Metadata rows for stored evidence binaries.
pub struct EventFileRepo;

impl EventFileRepo {
    pub async fn create(pool: &PgPool, input: &CreateEventFile) -> Result<EventFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_files
                (event_id, kind, filename, mime, size, storage_key, url, thumbnail_url, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventFile>(&query)
            .bind(input.event_id)
            .bind(input.kind.as_str())
            .bind(&input.filename)
            .bind(&input.mime)
            .bind(input.size)
            .bind(&input.storage_key)
            .bind(&input.url)
            .bind(&input.thumbnail_url)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Files of an event, newest first, optionally restricted to one kind.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
        kind: Option<FileKind>,
    ) -> Result<Vec<EventFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_files
             WHERE event_id = $1 AND ($2::text IS NULL OR kind = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, EventFile>(&query)
            .bind(event_id)
            .bind(kind.map(FileKind::as_str))
            .fetch_all(pool)
            .await
    }

    /// Find a file by id, scoped to its event.
    pub async fn find_by_id(
        pool: &PgPool,
        event_id: DbId,
        id: DbId,
    ) -> Result<Option<EventFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_files WHERE id = $1 AND event_id = $2");
        sqlx::query_as::<_, EventFile>(&query)
            .bind(id)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, event_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_files WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
