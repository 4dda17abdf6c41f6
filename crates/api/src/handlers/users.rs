//! Handlers for the `/users` resource.
//!
//! All endpoints require the `ADMIN` role. Accounts are never hard-deleted;
//! deactivation flips `is_active` and revokes the user's sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use evidencias_core::audit::{action, entity};
use evidencias_core::roles::UserRole;
use evidencias_core::types::DbId;
use evidencias_core::user::{RegisterInput, RoleChange, UserPatch};
use evidencias_db::models::user::UserResponse;
use evidencias_db::repositories::{SessionRepo, UserRepo};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::create_user as insert_user;
use crate::handlers::record_audit;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`: a registration plus an optional role.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub account: RegisterInput,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// GET /api/v1/users
///
/// Every account, active or not, ordered by name.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let role = input.role.unwrap_or_default();
    let user = insert_user(&state, input.account, role).await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %user.id, %role, "User created");
    record_audit(
        &state,
        admin.user_id,
        action::CREATE,
        entity::USER,
        user.id,
        json!({ "email": user.email, "role": role }),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// PUT /api/v1/users/{id}
///
/// Partial update: only supplied fields change.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UserPatch>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let patch = patch.normalized();
    patch.check()?;

    let user = UserRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    if patch.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    record_audit(
        &state,
        admin.user_id,
        action::UPDATE,
        entity::USER,
        id,
        serde_json::to_value(&patch).unwrap_or_default(),
    )
    .await;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PATCH /api/v1/users/{id}/role
pub async fn change_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<RoleChange>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::set_role(&state.pool, id, body.role)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(admin_id = %admin.user_id, user_id = %id, role = %body.role, "Role changed");
    record_audit(
        &state,
        admin.user_id,
        action::ROLE_CHANGE,
        entity::USER,
        id,
        json!({ "role": body.role }),
    )
    .await;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PATCH /api/v1/users/{id}/deactivate
///
/// Soft-deactivate. The row is kept and still listed.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Administrators cannot deactivate their own account".into(),
        ));
    }

    let user = UserRepo::deactivate(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %id, "User deactivated");
    record_audit(
        &state,
        admin.user_id,
        action::DEACTIVATE,
        entity::USER,
        id,
        json!({}),
    )
    .await;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}
