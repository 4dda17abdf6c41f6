//! Repository for the `event_notes` table.

use evidencias_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::EventNote;

const COLUMNS: &str = "id, event_id, text, created_by, created_at, updated_at";

pub struct EventNoteRepo;

impl EventNoteRepo {
    /// Notes of an event, newest first.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<EventNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_notes WHERE event_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, EventNote>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        event_id: DbId,
        id: DbId,
    ) -> Result<Option<EventNote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_notes WHERE id = $1 AND event_id = $2");
        sqlx::query_as::<_, EventNote>(&query)
            .bind(id)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        text: &str,
        created_by: DbId,
    ) -> Result<EventNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_notes (event_id, text, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventNote>(&query)
            .bind(event_id)
            .bind(text)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Replace the text and stamp `updated_at`.
    pub async fn update(
        pool: &PgPool,
        event_id: DbId,
        id: DbId,
        text: &str,
    ) -> Result<Option<EventNote>, sqlx::Error> {
        let query = format!(
            "UPDATE event_notes SET text = $3, updated_at = NOW()
             WHERE id = $1 AND event_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventNote>(&query)
            .bind(id)
            .bind(event_id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, event_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_notes WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
