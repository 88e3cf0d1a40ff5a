//! services/api/src/web/admin.rs
//!
//! Admin-only statistics, the enrollment ledger and the admin panel session.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::auth::AuthError;
use crate::error::ApiResult;
use crate::web::extract::ApiQuery;
use crate::web::middleware::{extract_token, RequireAdmin, ACCESS_TOKEN_COOKIE};
use crate::web::schemas::{
    AdminIdentityResponse, CourseStatsResponse, EnrollmentResponse, LessonResponse,
    LimitParams, PaginationParams, PlatformOverviewResponse, UserResponse, UserStatsResponse,
};
use crate::web::state::AppState;

//=========================================================================================
// Statistics
//=========================================================================================

/// GET /api/admin/stats/courses - Students, lessons and mean rating per course
#[utoipa::path(
    get,
    path = "/api/admin/stats/courses",
    tag = "admin",
    security(("bearer" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Course statistics", body = [CourseStatsResponse]),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn course_stats_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<CourseStatsResponse>>> {
    let stats = state.reporter.course_stats(params.page()).await?;
    Ok(Json(stats.into_iter().map(CourseStatsResponse::from).collect()))
}

/// GET /api/admin/stats/users - Enrollment, comment and rating counts per user
#[utoipa::path(
    get,
    path = "/api/admin/stats/users",
    tag = "admin",
    security(("bearer" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "User statistics", body = [UserStatsResponse]),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn user_stats_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<UserStatsResponse>>> {
    let stats = state.reporter.user_stats(params.page()).await?;
    Ok(Json(stats.into_iter().map(UserStatsResponse::from).collect()))
}

/// GET /api/admin/stats/popular-lessons - Best rated lessons
#[utoipa::path(
    get,
    path = "/api/admin/stats/popular-lessons",
    tag = "admin",
    security(("bearer" = [])),
    params(LimitParams),
    responses(
        (status = 200, description = "Ranked lessons", body = [LessonResponse]),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn popular_lessons_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> ApiResult<Json<Vec<LessonResponse>>> {
    let lessons = state.reporter.popular_lessons(params.limit()).await?;
    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

/// GET /api/admin/stats/active-users - Users with the most comments plus ratings
#[utoipa::path(
    get,
    path = "/api/admin/stats/active-users",
    tag = "admin",
    security(("bearer" = [])),
    params(LimitParams),
    responses(
        (status = 200, description = "Users by activity", body = [UserResponse]),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn active_users_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.reporter.active_users(params.limit()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/admin/stats/overview - Row counts for the dashboard
#[utoipa::path(
    get,
    path = "/api/admin/stats/overview",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Platform totals", body = PlatformOverviewResponse),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn overview_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
) -> ApiResult<Json<PlatformOverviewResponse>> {
    let totals = state.reporter.platform_overview().await?;
    Ok(Json(totals.into()))
}

/// GET /api/admin/enrollments - Every enrollment
#[utoipa::path(
    get,
    path = "/api/admin/enrollments",
    tag = "admin",
    security(("bearer" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Enrollments", body = [EnrollmentResponse]),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn list_enrollments_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<EnrollmentResponse>>> {
    let enrollments = state.store.list_enrollments(params.page()).await?;
    Ok(Json(
        enrollments.into_iter().map(EnrollmentResponse::from).collect(),
    ))
}

//=========================================================================================
// Admin Panel Session
//=========================================================================================

/// POST /api/admin/auth-check - Confirm the token belongs to an administrator
#[utoipa::path(
    post,
    path = "/api/admin/auth-check",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Administrator identity", body = AdminIdentityResponse),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn auth_check_handler(RequireAdmin(admin): RequireAdmin) -> Json<AdminIdentityResponse> {
    Json(AdminIdentityResponse::from(&admin))
}

/// POST /api/admin/session - Store the caller's token in an HttpOnly cookie for the panel
#[utoipa::path(
    post,
    path = "/api/admin/session",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Cookie set", body = AdminIdentityResponse),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn admin_session_handler(
    State(state): State<Arc<AppState>>,
    RequireAdmin(admin): RequireAdmin,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = extract_token(&headers).ok_or(AuthError::MissingToken)?;
    let cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        state.config.jwt.access_token_expiry_mins * 60
    );

    info!(user_id = admin.id, "Admin panel session started");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AdminIdentityResponse::from(&admin)),
    ))
}
