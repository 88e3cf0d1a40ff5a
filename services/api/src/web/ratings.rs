//! services/api/src/web/ratings.rs
//!
//! Lesson ratings. One rating per user and lesson; submitting again replaces the stars.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use course_platform_core::{Action, DbId};
use tracing::info;
use validator::Validate;

use crate::error::ApiResult;
use crate::web::access::{guard, load_lesson_context};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::middleware::CurrentUser;
use crate::web::schemas::{PaginationParams, RatingRequest, RatingResponse};
use crate::web::state::AppState;

/// POST /api/ratings - Rate a lesson, or change an existing rating (enrolled users only)
#[utoipa::path(
    post,
    path = "/api/ratings",
    tag = "ratings",
    security(("bearer" = [])),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating stored", body = RatingResponse),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Lesson not found"),
        (status = 422, description = "Stars must be between 1 and 5")
    )
)]
pub async fn rate_lesson_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(req): ApiJson<RatingRequest>,
) -> ApiResult<Json<RatingResponse>> {
    req.validate()?;
    let principal = user.principal();
    let ctx = load_lesson_context(state.store.as_ref(), &principal, req.lesson_id).await?;
    guard(
        &principal,
        &Action::RateLesson {
            enrolled: ctx.enrolled,
        },
    )?;

    let rating = state
        .store
        .upsert_rating(principal.user_id, ctx.lesson.id, req.stars)
        .await?;

    info!(
        user_id = principal.user_id,
        lesson_id = ctx.lesson.id,
        stars = rating.stars,
        "Rating stored"
    );
    Ok(Json(rating.into()))
}

/// GET /api/ratings/lesson/{lesson_id} - All ratings on a lesson
#[utoipa::path(
    get,
    path = "/api/ratings/lesson/{lesson_id}",
    tag = "ratings",
    security(("bearer" = [])),
    params(("lesson_id" = i64, Path, description = "Lesson id"), PaginationParams),
    responses(
        (status = 200, description = "Ratings", body = [RatingResponse]),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn lesson_ratings_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(lesson_id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<RatingResponse>>> {
    let principal = user.principal();
    let ctx = load_lesson_context(state.store.as_ref(), &principal, lesson_id).await?;
    guard(&principal, &Action::ViewLessonRatings(ctx.scope()))?;

    let ratings = state
        .store
        .list_lesson_ratings(lesson_id, params.page())
        .await?;
    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}

/// GET /api/ratings/lesson/{lesson_id}/average - Mean stars, 0.0 when unrated
#[utoipa::path(
    get,
    path = "/api/ratings/lesson/{lesson_id}/average",
    tag = "ratings",
    params(("lesson_id" = i64, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Average rating rounded to one decimal", body = f64),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn lesson_average_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(lesson_id): ApiPath<DbId>,
) -> ApiResult<Json<f64>> {
    let average = state.reporter.lesson_average_rating(lesson_id).await?;
    Ok(Json(average))
}

/// GET /api/ratings/my - Ratings left by the caller
#[utoipa::path(
    get,
    path = "/api/ratings/my",
    tag = "ratings",
    security(("bearer" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Ratings", body = [RatingResponse]))
)]
pub async fn my_ratings_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<Vec<RatingResponse>>> {
    let ratings = state.store.list_user_ratings(user.id, params.page()).await?;
    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}

/// DELETE /api/ratings/{rating_id} - Remove a rating (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/ratings/{rating_id}",
    tag = "ratings",
    security(("bearer" = [])),
    params(("rating_id" = i64, Path, description = "Rating id")),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 403, description = "Not the rating owner"),
        (status = 404, description = "Rating not found")
    )
)]
pub async fn delete_rating_handler(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(rating_id): ApiPath<DbId>,
) -> ApiResult<StatusCode> {
    let rating = state.store.get_rating(rating_id).await?;
    guard(&user.principal(), &Action::DeleteRating(&rating))?;
    state.store.delete_rating(rating_id).await?;

    info!(user_id = user.0.id, rating_id, "Rating deleted");
    Ok(StatusCode::NO_CONTENT)
}
