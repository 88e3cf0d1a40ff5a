//! services/api/src/web/rest.rs
//!
//! Service-level endpoints and the master definition for the OpenAPI specification.

use axum::Json;
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::web::{admin, auth, comments, courses, lessons, ratings, schemas, users};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        health_handler,
        auth::register_handler,
        auth::token_handler,
        users::me_handler,
        users::update_me_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        courses::create_course_handler,
        courses::list_courses_handler,
        courses::get_course_handler,
        courses::update_course_handler,
        courses::delete_course_handler,
        courses::enroll_handler,
        courses::my_courses_handler,
        courses::course_students_handler,
        courses::delete_enrollment_handler,
        lessons::create_lesson_handler,
        lessons::list_lessons_handler,
        lessons::get_lesson_handler,
        lessons::update_lesson_handler,
        lessons::delete_lesson_handler,
        comments::create_comment_handler,
        comments::lesson_comments_handler,
        comments::get_comment_handler,
        comments::update_comment_handler,
        comments::delete_comment_handler,
        ratings::rate_lesson_handler,
        ratings::lesson_ratings_handler,
        ratings::lesson_average_handler,
        ratings::my_ratings_handler,
        ratings::delete_rating_handler,
        admin::course_stats_handler,
        admin::user_stats_handler,
        admin::popular_lessons_handler,
        admin::active_users_handler,
        admin::overview_handler,
        admin::list_enrollments_handler,
        admin::auth_check_handler,
        admin::admin_session_handler,
    ),
    components(
        schemas(
            ServiceMessage,
            schemas::RegisterRequest,
            schemas::TokenRequest,
            schemas::TokenResponse,
            schemas::UserUpdateRequest,
            schemas::AdminUserUpdateRequest,
            schemas::UserResponse,
            schemas::CourseCreateRequest,
            schemas::CourseUpdateRequest,
            schemas::CourseResponse,
            schemas::CourseDetailResponse,
            schemas::EnrollmentResponse,
            schemas::LessonCreateRequest,
            schemas::LessonUpdateRequest,
            schemas::LessonResponse,
            schemas::LessonDetailResponse,
            schemas::CommentCreateRequest,
            schemas::CommentUpdateRequest,
            schemas::CommentResponse,
            schemas::RatingRequest,
            schemas::RatingResponse,
            schemas::CourseStatsResponse,
            schemas::UserStatsResponse,
            schemas::PlatformOverviewResponse,
            schemas::AdminIdentityResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Course Platform API", description = "Online course platform endpoints.")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by `security(("bearer" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// Service Endpoints
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ServiceMessage {
    message: String,
}

/// Welcome message.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = ServiceMessage))
)]
pub async fn root_handler() -> Json<ServiceMessage> {
    Json(ServiceMessage {
        message: "Welcome to the online course platform API".to_string(),
    })
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = ServiceMessage))
)]
pub async fn health_handler() -> Json<ServiceMessage> {
    Json(ServiceMessage {
        message: "ok".to_string(),
    })
}
