//! services/api/src/web/courses.rs
//!
//! Course CRUD, enrollment and the course roster.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use course_platform_core::{Action, CourseChanges, DbId, NewCourse, Page, PortError};
use tracing::info;
use validator::Validate;

use crate::error::ApiResult;
use crate::web::access::guard;
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::middleware::CurrentUser;
use crate::web::schemas::{
    non_empty, CourseCreateRequest, CourseDetailResponse, CourseListParams, CourseResponse,
    CourseUpdateRequest, EnrollmentResponse, UserResponse,
};
use crate::web::state::AppState;

/// POST /api/courses - Create a course authored by the caller
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "courses",
    security(("bearer" = [])),
    request_body = CourseCreateRequest,
    responses(
        (status = 200, description = "Course created", body = CourseResponse),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_course_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CourseCreateRequest>,
) -> ApiResult<Json<CourseResponse>> {
    req.validate()?;
    let course = state
        .store
        .create_course(NewCourse {
            title: req.title,
            description: req.description,
            author_id: user.id,
        })
        .await?;

    info!(user_id = user.id, course_id = course.id, "Course created");
    Ok(Json(course.into()))
}

/// GET /api/courses - List courses, optionally filtered by a search term
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    params(CourseListParams),
    responses((status = 200, description = "Courses", body = [CourseResponse]))
)]
pub async fn list_courses_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<CourseListParams>,
) -> ApiResult<Json<Vec<CourseResponse>>> {
    let search = non_empty(params.search);
    let courses = state
        .store
        .list_courses(search.as_deref(), Page::new(params.skip, params.limit))
        .await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// GET /api/courses/{course_id} - A course with its lessons and author
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    tag = "courses",
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetailResponse),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(course_id): ApiPath<DbId>,
) -> ApiResult<Json<CourseDetailResponse>> {
    let course = state.store.get_course(course_id).await?;
    let lessons = state.store.list_lessons(Some(course_id), Page::all()).await?;
    let author = state.store.get_user(course.author_id).await?;
    Ok(Json(CourseDetailResponse::new(course, lessons, author)))
}

/// PUT /api/courses/{course_id} - Update a course (author or admin)
#[utoipa::path(
    put,
    path = "/api/courses/{course_id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("course_id" = i64, Path, description = "Course id")),
    request_body = CourseUpdateRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 403, description = "Not the course author"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(course_id): ApiPath<DbId>,
    ApiJson(req): ApiJson<CourseUpdateRequest>,
) -> ApiResult<Json<CourseResponse>> {
    let course = state.store.get_course(course_id).await?;
    guard(&user.principal(), &Action::UpdateCourse(&course))?;

    let changes = CourseChanges {
        title: non_empty(req.title),
        description: non_empty(req.description),
    };
    let updated = state.store.update_course(course_id, changes).await?;

    info!(user_id = user.0.id, course_id, "Course updated");
    Ok(Json(updated.into()))
}

/// DELETE /api/courses/{course_id} - Delete a course with its lessons and enrollments
#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Not the course author"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(course_id): ApiPath<DbId>,
) -> ApiResult<StatusCode> {
    let course = state.store.get_course(course_id).await?;
    guard(&user.principal(), &Action::DeleteCourse(&course))?;
    state.store.delete_course(course_id).await?;

    info!(user_id = user.0.id, course_id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Enrollment
//=========================================================================================

/// POST /api/courses/enroll/{course_id} - Enroll the caller in a course
#[utoipa::path(
    post,
    path = "/api/courses/enroll/{course_id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrolled", body = EnrollmentResponse),
        (status = 400, description = "Already enrolled"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn enroll_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(course_id): ApiPath<DbId>,
) -> ApiResult<Json<EnrollmentResponse>> {
    state.store.get_course(course_id).await?;
    if state.store.find_enrollment(user.id, course_id).await?.is_some() {
        return Err(PortError::Duplicate("Already enrolled in this course".to_string()).into());
    }
    let enrollment = state.store.create_enrollment(user.id, course_id).await?;

    info!(user_id = user.id, course_id, "User enrolled");
    Ok(Json(enrollment.into()))
}

/// GET /api/courses/enrolled/my - Courses the caller is enrolled in
#[utoipa::path(
    get,
    path = "/api/courses/enrolled/my",
    tag = "courses",
    security(("bearer" = [])),
    responses((status = 200, description = "Enrolled courses", body = [CourseResponse]))
)]
pub async fn my_courses_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<CourseResponse>>> {
    let courses = state.store.list_enrolled_courses(user.id).await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// GET /api/courses/{course_id}/students - Users enrolled in a course (author or admin)
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/students",
    tag = "courses",
    security(("bearer" = [])),
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrolled users", body = [UserResponse]),
        (status = 403, description = "Not the course author"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_students_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(course_id): ApiPath<DbId>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let course = state.store.get_course(course_id).await?;
    guard(&user.principal(), &Action::ViewCourseStudents(&course))?;
    let students = state.store.list_course_students(course_id).await?;
    Ok(Json(students.into_iter().map(UserResponse::from).collect()))
}

/// DELETE /api/enrollments/{enrollment_id} - Leave a course (enrollment owner or admin)
#[utoipa::path(
    delete,
    path = "/api/enrollments/{enrollment_id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("enrollment_id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 403, description = "Not the enrollment owner"),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn delete_enrollment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(enrollment_id): ApiPath<DbId>,
) -> ApiResult<StatusCode> {
    let enrollment = state.store.get_enrollment(enrollment_id).await?;
    guard(&user.principal(), &Action::DeleteEnrollment(&enrollment))?;
    state.store.delete_enrollment(enrollment_id).await?;

    info!(user_id = user.0.id, enrollment_id, "Enrollment removed");
    Ok(StatusCode::NO_CONTENT)
}
