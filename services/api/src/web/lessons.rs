//! services/api/src/web/lessons.rs
//!
//! Lesson CRUD. Reading a lesson's detail is gated on enrollment.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use course_platform_core::{Action, DbId, LessonChanges, NewLesson, Page};
use tracing::info;
use validator::Validate;

use crate::error::ApiResult;
use crate::web::access::{guard, load_lesson_context};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::middleware::CurrentUser;
use crate::web::schemas::{
    non_empty, LessonCreateRequest, LessonDetailResponse, LessonListParams, LessonResponse,
    LessonUpdateRequest,
};
use crate::web::state::AppState;

/// POST /api/lessons - Add a lesson to a course (course author or admin)
#[utoipa::path(
    post,
    path = "/api/lessons",
    tag = "lessons",
    security(("bearer" = [])),
    request_body = LessonCreateRequest,
    responses(
        (status = 200, description = "Lesson created", body = LessonResponse),
        (status = 403, description = "Not the course author"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn create_lesson_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(req): ApiJson<LessonCreateRequest>,
) -> ApiResult<Json<LessonResponse>> {
    req.validate()?;
    let course = state.store.get_course(req.course_id).await?;
    guard(&user.principal(), &Action::CreateLesson(&course))?;

    let lesson = state
        .store
        .create_lesson(NewLesson {
            course_id: course.id,
            title: req.title,
            video_url: req.video_url,
            content: req.content,
            order: req.order,
        })
        .await?;

    info!(user_id = user.0.id, course_id = course.id, lesson_id = lesson.id, "Lesson created");
    Ok(Json(lesson.into()))
}

/// GET /api/lessons - List lessons in display order, optionally for one course
#[utoipa::path(
    get,
    path = "/api/lessons",
    tag = "lessons",
    params(LessonListParams),
    responses((status = 200, description = "Lessons", body = [LessonResponse]))
)]
pub async fn list_lessons_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<LessonListParams>,
) -> ApiResult<Json<Vec<LessonResponse>>> {
    let lessons = state
        .store
        .list_lessons(params.course_id, Page::new(params.skip, params.limit))
        .await?;
    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

/// GET /api/lessons/{lesson_id} - Lesson detail with comments and average rating
#[utoipa::path(
    get,
    path = "/api/lessons/{lesson_id}",
    tag = "lessons",
    security(("bearer" = [])),
    params(("lesson_id" = i64, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson detail", body = LessonDetailResponse),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn get_lesson_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(lesson_id): ApiPath<DbId>,
) -> ApiResult<Json<LessonDetailResponse>> {
    let principal = user.principal();
    let ctx = load_lesson_context(state.store.as_ref(), &principal, lesson_id).await?;
    guard(&principal, &Action::ViewLesson(ctx.scope()))?;

    let comments = state.store.list_lesson_comments(lesson_id, Page::all()).await?;
    let average_rating = state.reporter.lesson_detail_average(lesson_id).await?;
    Ok(Json(LessonDetailResponse::new(
        ctx.lesson,
        comments,
        average_rating,
    )))
}

/// PUT /api/lessons/{lesson_id} - Update a lesson (course author or admin)
#[utoipa::path(
    put,
    path = "/api/lessons/{lesson_id}",
    tag = "lessons",
    security(("bearer" = [])),
    params(("lesson_id" = i64, Path, description = "Lesson id")),
    request_body = LessonUpdateRequest,
    responses(
        (status = 200, description = "Lesson updated", body = LessonResponse),
        (status = 403, description = "Not the course author"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn update_lesson_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(lesson_id): ApiPath<DbId>,
    ApiJson(req): ApiJson<LessonUpdateRequest>,
) -> ApiResult<Json<LessonResponse>> {
    let lesson = state.store.get_lesson(lesson_id).await?;
    let course = state.store.get_course(lesson.course_id).await?;
    guard(&user.principal(), &Action::UpdateLesson(&course))?;

    let changes = LessonChanges {
        title: non_empty(req.title),
        video_url: non_empty(req.video_url),
        content: non_empty(req.content),
        order: req.order,
    };
    let updated = state.store.update_lesson(lesson_id, changes).await?;

    info!(user_id = user.0.id, lesson_id, "Lesson updated");
    Ok(Json(updated.into()))
}

/// DELETE /api/lessons/{lesson_id} - Delete a lesson with its comments and ratings
#[utoipa::path(
    delete,
    path = "/api/lessons/{lesson_id}",
    tag = "lessons",
    security(("bearer" = [])),
    params(("lesson_id" = i64, Path, description = "Lesson id")),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 403, description = "Not the course author"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn delete_lesson_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(lesson_id): ApiPath<DbId>,
) -> ApiResult<StatusCode> {
    let lesson = state.store.get_lesson(lesson_id).await?;
    let course = state.store.get_course(lesson.course_id).await?;
    guard(&user.principal(), &Action::DeleteLesson(&course))?;
    state.store.delete_lesson(lesson_id).await?;

    info!(user_id = user.0.id, lesson_id, "Lesson deleted");
    Ok(StatusCode::NO_CONTENT)
}
