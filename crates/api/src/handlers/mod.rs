//! HTTP handlers, one module per resource.
//!
//! Helpers shared by the event-scoped handlers (parent lookup, edit checks,
//! audit recording) live here.

pub mod attendance;
pub mod audit;
pub mod auth;
pub mod events;
pub mod files;
pub mod notes;
pub mod storage;
pub mod users;

use evidencias_core::roles::can_edit_event;
use evidencias_core::types::DbId;
use evidencias_db::models::audit::CreateAuditLog;
use evidencias_db::models::event::Event;
use evidencias_db::repositories::{AuditLogRepo, EventRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load the parent event of a child route, or 404.
pub(crate) async fn load_event(state: &AppState, event_id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", event_id))
}

/// Reject callers who are neither the event's creator nor an admin.
pub(crate) fn ensure_can_edit(auth: &AuthUser, event: &Event) -> AppResult<()> {
    if can_edit_event(auth.role, auth.user_id, event.created_by) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the event's creator or an admin may modify it",
        ))
    }
}

/// Load the event and check the caller may modify it.
pub(crate) async fn load_editable_event(
    state: &AppState,
    auth: &AuthUser,
    event_id: DbId,
) -> AppResult<Event> {
    let event = load_event(state, event_id).await?;
    ensure_can_edit(auth, &event)?;
    Ok(event)
}

/// Record an audit entry. Failures are logged and swallowed so the audited
/// action itself still succeeds.
pub(crate) async fn record_audit(
    state: &AppState,
    user_id: DbId,
    action: &'static str,
    entity: &'static str,
    entity_id: impl ToString,
    details: serde_json::Value,
) {
    let input = CreateAuditLog {
        user_id,
        action,
        entity,
        entity_id: entity_id.to_string(),
        details,
    };
    if let Err(e) = AuditLogRepo::create(&state.pool, &input).await {
        tracing::warn!(error = %e, action, entity, "Failed to record audit log");
    }
}
