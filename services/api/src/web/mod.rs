pub mod access;
pub mod admin;
pub mod auth;
pub mod comments;
pub mod courses;
pub mod extract;
pub mod lessons;
pub mod middleware;
pub mod ratings;
pub mod rest;
pub mod schemas;
pub mod state;
pub mod users;

use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rest::ApiDoc;
use state::AppState;

/// Builds the complete application: `/api` routes, service endpoints and Swagger UI.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api_router = Router::new()
        // --- Auth ---
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/token", post(auth::token_handler))
        // --- Users ---
        .route(
            "/users/me",
            get(users::me_handler).put(users::update_me_handler),
        )
        .route("/users", get(users::list_users_handler))
        .route(
            "/users/{user_id}",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        // --- Courses and enrollment ---
        .route(
            "/courses",
            get(courses::list_courses_handler).post(courses::create_course_handler),
        )
        .route("/courses/enrolled/my", get(courses::my_courses_handler))
        .route("/courses/enroll/{course_id}", post(courses::enroll_handler))
        .route(
            "/courses/{course_id}",
            get(courses::get_course_handler)
                .put(courses::update_course_handler)
                .delete(courses::delete_course_handler),
        )
        .route(
            "/courses/{course_id}/students",
            get(courses::course_students_handler),
        )
        .route(
            "/enrollments/{enrollment_id}",
            axum::routing::delete(courses::delete_enrollment_handler),
        )
        // --- Lessons ---
        .route(
            "/lessons",
            get(lessons::list_lessons_handler).post(lessons::create_lesson_handler),
        )
        .route(
            "/lessons/{lesson_id}",
            get(lessons::get_lesson_handler)
                .put(lessons::update_lesson_handler)
                .delete(lessons::delete_lesson_handler),
        )
        // --- Comments ---
        .route("/comments", post(comments::create_comment_handler))
        .route(
            "/comments/lesson/{lesson_id}",
            get(comments::lesson_comments_handler),
        )
        .route(
            "/comments/{comment_id}",
            get(comments::get_comment_handler)
                .put(comments::update_comment_handler)
                .delete(comments::delete_comment_handler),
        )
        // --- Ratings ---
        .route("/ratings", post(ratings::rate_lesson_handler))
        .route("/ratings/my", get(ratings::my_ratings_handler))
        .route(
            "/ratings/lesson/{lesson_id}",
            get(ratings::lesson_ratings_handler),
        )
        .route(
            "/ratings/lesson/{lesson_id}/average",
            get(ratings::lesson_average_handler),
        )
        .route(
            "/ratings/{rating_id}",
            axum::routing::delete(ratings::delete_rating_handler),
        )
        // --- Admin ---
        .route("/admin/stats/courses", get(admin::course_stats_handler))
        .route("/admin/stats/users", get(admin::user_stats_handler))
        .route(
            "/admin/stats/popular-lessons",
            get(admin::popular_lessons_handler),
        )
        .route(
            "/admin/stats/active-users",
            get(admin::active_users_handler),
        )
        .route("/admin/stats/overview", get(admin::overview_handler))
        .route("/admin/enrollments", get(admin::list_enrollments_handler))
        .route("/admin/auth-check", post(admin::auth_check_handler))
        .route("/admin/session", post(admin::admin_session_handler));

    let app_router = Router::new()
        .route("/", get(rest::root_handler))
        .route("/health", get(rest::health_handler))
        .nest("/api", api_router)
        .with_state(state);

    // Merge the app router with the Swagger UI router for a complete application.
    Router::new()
        .merge(app_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// An empty origin list allows any origin, without credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    if origins.is_empty() {
        return base.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(allowed).allow_credentials(true)
}
