//! services/api/src/web/users.rs
//!
//! Profile endpoints for the current user and user management for admins.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use course_platform_core::{DbId, UserChanges};
use tracing::info;
use validator::Validate;

use crate::auth::password;
use crate::error::ApiResult;
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::middleware::{CurrentUser, RequireAdmin};
use crate::web::schemas::{
    non_empty, AdminUserUpdateRequest, PaginationParams, UserResponse, UserUpdateRequest,
};
use crate::web::state::AppState;

/// Builds the store changes for a profile update, hashing a new password if one is given.
fn profile_changes(
    full_name: Option<String>,
    email: Option<String>,
    new_password: Option<String>,
) -> ApiResult<UserChanges> {
    let password_hash = match non_empty(new_password) {
        Some(plain) => Some(password::hash_password(&plain)?),
        None => None,
    };
    Ok(UserChanges {
        full_name: non_empty(full_name),
        email: non_empty(email),
        password_hash,
        ..UserChanges::default()
    })
}

/// GET /api/users/me - The authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// PUT /api/users/me - Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "users",
    security(("bearer" = [])),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Email already in use"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_me_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<UserUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;
    let changes = profile_changes(req.full_name, req.email, req.password)?;
    let updated = state.store.update_user(user.id, changes).await?;

    info!(user_id = updated.id, "Profile updated");
    Ok(Json(updated.into()))
}

/// GET /api/users - List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    security(("bearer" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.store.list_users(params.page()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{user_id} - Read one user (admin only)
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "users",
    security(("bearer" = [])),
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiPath(user_id): ApiPath<DbId>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.store.get_user(user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /api/users/{user_id} - Update any user, including account flags (admin only)
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "users",
    security(("bearer" = [])),
    params(("user_id" = i64, Path, description = "User id")),
    request_body = AdminUserUpdateRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Email already in use"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(user_id): ApiPath<DbId>,
    ApiJson(req): ApiJson<AdminUserUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;
    state.store.get_user(user_id).await?;

    let changes = UserChanges {
        is_active: req.is_active,
        is_admin: req.is_admin,
        ..profile_changes(req.full_name, req.email, req.password)?
    };
    let updated = state.store.update_user(user_id, changes).await?;

    info!(admin_id = admin.id, user_id, "User updated by admin");
    Ok(Json(updated.into()))
}

/// DELETE /api/users/{user_id} - Delete a user and everything they own (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "users",
    security(("bearer" = [])),
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(user_id): ApiPath<DbId>,
) -> ApiResult<StatusCode> {
    state.store.delete_user(user_id).await?;
    info!(admin_id = admin.id, user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
