//! Repository for the `events` table.

use evidencias_core::event::{EventFilter, EventInput, EventPatch, EventStatus, EventType};
use evidencias_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::Event;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, type, status, start_at, end_at, location, audience, \
                        description, tags, schools, created_by, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event owned by `created_by`. `input` is expected to be
    /// normalised and validated already.
    pub async fn create(
        pool: &PgPool,
        input: &EventInput,
        created_by: DbId,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (title, type, status, start_at, end_at, location, audience,
                 description, tags, schools, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(input.event_type.as_str())
            .bind(input.status.as_str())
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(&input.location)
            .bind(&input.audience)
            .bind(&input.description)
            .bind(&input.tags)
            .bind(&input.schools)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events matching `filter`, most recent `start_at` first.
    ///
    /// Absent criteria match everything; the title search is a literal,
    /// case-insensitive substring match.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1::text IS NULL OR type = $1)
               AND ($2::text IS NULL OR status = $2)
               AND ($3::text IS NULL OR title ILIKE $3)
               AND ($4::timestamptz IS NULL OR start_at >= $4)
               AND ($5::timestamptz IS NULL OR start_at <= $5)
             ORDER BY start_at DESC, created_at DESC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(filter.event_type.map(EventType::as_str))
            .bind(filter.status.map(EventStatus::as_str))
            .bind(filter.search_pattern())
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(pool)
            .await
    }

    /// Apply a normalised patch and stamp `updated_at`.
    ///
    /// For `location`, `audience` and `description` an empty string clears
    /// the column. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &EventPatch,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                type = COALESCE($3, type),
                status = COALESCE($4, status),
                start_at = COALESCE($5, start_at),
                end_at = COALESCE($6, end_at),
                location = CASE WHEN $7::text IS NULL THEN location ELSE NULLIF($7, '') END,
                audience = CASE WHEN $8::text IS NULL THEN audience ELSE NULLIF($8, '') END,
                description = CASE WHEN $9::text IS NULL THEN description ELSE NULLIF($9, '') END,
                tags = COALESCE($10, tags),
                schools = COALESCE($11, schools),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(patch.event_type.map(EventType::as_str))
            .bind(patch.status.map(EventStatus::as_str))
            .bind(patch.start_at)
            .bind(patch.end_at)
            .bind(&patch.location)
            .bind(&patch.audience)
            .bind(&patch.description)
            .bind(&patch.tags)
            .bind(&patch.schools)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event. Files, attendance and notes go with it through
    /// `ON DELETE CASCADE`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
