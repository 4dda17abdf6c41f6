//! Repository for the `audit_logs` table.

use evidencias_core::audit::clamp_page;
use sqlx::PgPool;

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

const COLUMNS: &str = "id, user_id, action, entity, entity_id, details, created_at";

/// Append and query operations for audit logs. Rows are never updated.
pub struct AuditLogRepo;

impl AuditLogRepo {
    pub async fn create(pool: &PgPool, input: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (user_id, action, entity, entity_id, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(input.user_id)
            .bind(input.action)
            .bind(input.entity)
            .bind(&input.entity_id)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    /// Newest entries first, filtered by entity name and acting user.
    pub async fn list(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let (limit, offset) = clamp_page(params.limit, params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE ($1::text IS NULL OR entity = $1)
               AND ($2::uuid IS NULL OR user_id = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(&params.entity)
            .bind(params.user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
