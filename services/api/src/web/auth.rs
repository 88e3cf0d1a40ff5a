//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration and token issuance.

use std::sync::Arc;

use axum::{extract::State, Json};
use course_platform_core::NewUser;
use tracing::info;
use validator::Validate;

use crate::auth::{self, jwt, password};
use crate::error::ApiResult;
use crate::web::extract::{ApiForm, ApiJson};
use crate::web::schemas::{RegisterRequest, TokenRequest, TokenResponse, UserResponse};
use crate::web::state::AppState;

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let user = state
        .store
        .create_user(NewUser {
            full_name: req.full_name,
            email: req.email,
            password_hash: password::hash_password(&req.password)?,
            is_active: true,
            is_admin: false,
        })
        .await?;

    info!(user_id = user.id, "User registered");
    Ok(Json(user.into()))
}

/// POST /api/auth/token - Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/token",
    tag = "auth",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 403, description = "Inactive user")
    )
)]
pub async fn token_handler(
    State(state): State<Arc<AppState>>,
    ApiForm(req): ApiForm<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = auth::authenticate(state.store.as_ref(), &req.username, &req.password).await?;
    let token = jwt::issue_access_token(&user.email, &state.config.jwt)?;

    info!(user_id = user.id, "Access token issued");
    Ok(Json(TokenResponse::bearer(token)))
}
