//! Repository for the `attendance` table.

use evidencias_core::attendance::AttendanceInput;
use evidencias_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::attendance::Attendance;

const COLUMNS: &str = "id, event_id, person_name, person_role, school, present, created_at";

/// Provides CRUD operations for attendance rows.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Attendance of an event ordered by person name.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Attendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance WHERE event_id = $1 ORDER BY person_name, created_at"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        input: &AttendanceInput,
    ) -> Result<Attendance, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut *conn, event_id, input).await
    }

    /// Insert every record in one transaction; either all rows are created or none.
    pub async fn create_many(
        pool: &PgPool,
        event_id: DbId,
        inputs: &[AttendanceInput],
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(Self::insert(&mut *tx, event_id, input).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn insert(
        conn: &mut PgConnection,
        event_id: DbId,
        input: &AttendanceInput,
    ) -> Result<Attendance, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance (event_id, person_name, person_role, school, present)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(event_id)
            .bind(&input.person_name)
            .bind(&input.person_role)
            .bind(&input.school)
            .bind(input.present)
            .fetch_one(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, event_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
