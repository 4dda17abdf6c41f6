//! Handler for the audit trail. Admin only.

use axum::extract::{Query, State};
use axum::Json;
use evidencias_db::models::audit::{AuditLog, AuditQuery};
use evidencias_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/audit-logs?entity=&user_id=&limit=&offset=
///
/// Newest entries first. `limit` is clamped to 1..=200 (default 50).
pub async fn list_audit_logs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<DataResponse<Vec<AuditLog>>>> {
    let logs = AuditLogRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: logs }))
}
