//! services/api/src/web/comments.rs
//!
//! Lesson comments. Reading and writing require access to the lesson's course;
//! edits are reserved to the comment's owner.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use course_platform_core::{Action, DbId, NewComment};
use tracing::info;
use validator::Validate;

use crate::error::ApiResult;
use crate::web::access::{guard, load_lesson_context};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::middleware::CurrentUser;
use crate::web::schemas::{
    CommentCreateRequest, CommentResponse, CommentUpdateRequest, PaginationParams,
};
use crate::web::state::AppState;

/// POST /api/comments - Comment on a lesson
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    security(("bearer" = [])),
    request_body = CommentCreateRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn create_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CommentCreateRequest>,
) -> ApiResult<Json<CommentResponse>> {
    req.validate()?;
    let principal = user.principal();
    let ctx = load_lesson_context(state.store.as_ref(), &principal, req.lesson_id).await?;
    guard(&principal, &Action::CreateComment(ctx.scope()))?;

    let comment = state
        .store
        .create_comment(NewComment {
            user_id: principal.user_id,
            lesson_id: ctx.lesson.id,
            text: req.text,
        })
        .await?;

    info!(
        user_id = principal.user_id,
        lesson_id = ctx.lesson.id,
        comment_id = comment.id,
        "Comment created"
    );
    Ok(Json(comment.into()))
}

/// GET /api/comments/lesson/{lesson_id} - Comments on a lesson, newest first
#[utoipa::path(
    get,
    path = "/api/comments/lesson/{lesson_id}",
    tag = "comments",
    security(("bearer" = [])),
    params(("lesson_id" = i64, Path, description = "Lesson id"), PaginationParams),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn lesson_comments_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(lesson_id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let principal = user.principal();
    let ctx = load_lesson_context(state.store.as_ref(), &principal, lesson_id).await?;
    guard(&principal, &Action::ViewLessonComments(ctx.scope()))?;

    let comments = state
        .store
        .list_lesson_comments(lesson_id, params.page())
        .await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// GET /api/comments/{comment_id} - Read one comment
#[utoipa::path(
    get,
    path = "/api/comments/{comment_id}",
    tag = "comments",
    security(("bearer" = [])),
    params(("comment_id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn get_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(comment_id): ApiPath<DbId>,
) -> ApiResult<Json<CommentResponse>> {
    let principal = user.principal();
    let comment = state.store.get_comment(comment_id).await?;
    let ctx = load_lesson_context(state.store.as_ref(), &principal, comment.lesson_id).await?;
    guard(&principal, &Action::ViewComment(ctx.scope()))?;
    Ok(Json(comment.into()))
}

/// PUT /api/comments/{comment_id} - Edit a comment (owner or admin)
#[utoipa::path(
    put,
    path = "/api/comments/{comment_id}",
    tag = "comments",
    security(("bearer" = [])),
    params(("comment_id" = i64, Path, description = "Comment id")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 403, description = "Not the comment owner"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn update_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(comment_id): ApiPath<DbId>,
    ApiJson(req): ApiJson<CommentUpdateRequest>,
) -> ApiResult<Json<CommentResponse>> {
    req.validate()?;
    let comment = state.store.get_comment(comment_id).await?;
    guard(&user.principal(), &Action::UpdateComment(&comment))?;
    let updated = state.store.update_comment_text(comment_id, &req.text).await?;

    info!(user_id = user.0.id, comment_id, "Comment updated");
    Ok(Json(updated.into()))
}

/// DELETE /api/comments/{comment_id} - Delete a comment (owner, course author or admin)
#[utoipa::path(
    delete,
    path = "/api/comments/{comment_id}",
    tag = "comments",
    security(("bearer" = [])),
    params(("comment_id" = i64, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(comment_id): ApiPath<DbId>,
) -> ApiResult<StatusCode> {
    let comment = state.store.get_comment(comment_id).await?;
    let lesson = state.store.get_lesson(comment.lesson_id).await?;
    let course = state.store.get_course(lesson.course_id).await?;
    guard(
        &user.principal(),
        &Action::DeleteComment {
            comment: &comment,
            course: &course,
        },
    )?;
    state.store.delete_comment(comment_id).await?;

    info!(user_id = user.0.id, comment_id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
