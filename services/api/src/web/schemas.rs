//! services/api/src/web/schemas.rs
//!
//! Request payloads, response bodies and query parameters shared by the handlers.
//! Domain types never leave the service directly; they are mapped here first.

use chrono::{DateTime, Utc};
use course_platform_core::{Comment, Course, DbId, Enrollment, Lesson, Page, Rating, User};
use course_platform_core::reporting::{CourseStats, PlatformTotals, UserStats};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::reporting::DEFAULT_RANKING_LIMIT;

/// Text fields in partial updates count as absent when empty.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

//=========================================================================================
// Query Parameters
//=========================================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Rows to skip. Defaults to 0.
    pub skip: Option<i64>,
    /// Maximum rows to return. Defaults to 100.
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CourseListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LessonListParams {
    pub course_id: Option<DbId>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LimitParams {
    /// Defaults to 10.
    pub limit: Option<usize>,
}

impl LimitParams {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_RANKING_LIMIT)
    }
}

//=========================================================================================
// Auth and Users
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// OAuth2 password form. `username` carries the email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Self-service profile update.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserUpdateRequest {
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Administrative user update; may also toggle the account flags.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct AdminUserUpdateRequest {
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            is_active: user.is_active,
            is_admin: user.is_admin,
        }
    }
}

//=========================================================================================
// Courses and Enrollments
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CourseCreateRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CourseUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub author_id: DbId,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            author_id: course.author_id,
            created_at: course.created_at,
        }
    }
}

/// A course with its lessons in display order and its author.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseDetailResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub author_id: DbId,
    pub created_at: DateTime<Utc>,
    pub lessons: Vec<LessonResponse>,
    pub author: UserResponse,
}

impl CourseDetailResponse {
    pub fn new(course: Course, lessons: Vec<Lesson>, author: User) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            author_id: course.author_id,
            created_at: course.created_at,
            lessons: lessons.into_iter().map(LessonResponse::from).collect(),
            author: author.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrolled_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

//=========================================================================================
// Lessons
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LessonCreateRequest {
    pub course_id: DbId,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub video_url: String,
    pub content: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LessonUpdateRequest {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub content: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonResponse {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub video_url: String,
    pub content: String,
    pub order: i32,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            video_url: lesson.video_url,
            content: lesson.content,
            order: lesson.order,
        }
    }
}

/// Lesson detail with its comments (newest first) and rounded average rating.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonDetailResponse {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub video_url: String,
    pub content: String,
    pub order: i32,
    pub comments: Vec<CommentResponse>,
    /// `null` when the lesson has no ratings.
    pub average_rating: Option<f64>,
}

impl LessonDetailResponse {
    pub fn new(lesson: Lesson, comments: Vec<Comment>, average_rating: Option<f64>) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            video_url: lesson.video_url,
            content: lesson.content,
            order: lesson.order,
            comments: comments.into_iter().map(CommentResponse::from).collect(),
            average_rating,
        }
    }
}

//=========================================================================================
// Comments and Ratings
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentCreateRequest {
    pub lesson_id: DbId,
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentUpdateRequest {
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            lesson_id: comment.lesson_id,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// Creates the caller's rating for the lesson, or replaces its stars.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RatingRequest {
    pub lesson_id: DbId,
    #[validate(range(min = 1, max = 5, message = "Stars must be between 1 and 5"))]
    pub stars: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatingResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub stars: i32,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            user_id: rating.user_id,
            lesson_id: rating.lesson_id,
            stars: rating.stars,
        }
    }
}

//=========================================================================================
// Admin
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseStatsResponse {
    pub course_id: DbId,
    pub title: String,
    pub total_students: i64,
    pub total_lessons: i64,
    pub average_rating: Option<f64>,
}

impl From<CourseStats> for CourseStatsResponse {
    fn from(stats: CourseStats) -> Self {
        Self {
            course_id: stats.course_id,
            title: stats.title,
            total_students: stats.total_students,
            total_lessons: stats.total_lessons,
            average_rating: stats.average_rating,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserStatsResponse {
    pub user_id: DbId,
    pub full_name: String,
    pub total_courses_enrolled: i64,
    pub total_comments: i64,
    pub total_ratings: i64,
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            user_id: stats.user_id,
            full_name: stats.full_name,
            total_courses_enrolled: stats.total_courses_enrolled,
            total_comments: stats.total_comments,
            total_ratings: stats.total_ratings,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlatformOverviewResponse {
    pub total_users: i64,
    pub total_courses: i64,
    pub total_lessons: i64,
    pub total_enrollments: i64,
    pub total_comments: i64,
    pub total_ratings: i64,
}

impl From<PlatformTotals> for PlatformOverviewResponse {
    fn from(totals: PlatformTotals) -> Self {
        Self {
            total_users: totals.users,
            total_courses: totals.courses,
            total_lessons: totals.lessons,
            total_enrollments: totals.enrollments,
            total_comments: totals.comments,
            total_ratings: totals.ratings,
        }
    }
}

/// Identity confirmed by the admin panel login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminIdentityResponse {
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}

impl From<&User> for AdminIdentityResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_treated_as_absent() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn rating_stars_are_range_checked() {
        let ok = RatingRequest { lesson_id: 1, stars: 5 };
        assert!(ok.validate().is_ok());
        let too_high = RatingRequest { lesson_id: 1, stars: 6 };
        assert!(too_high.validate().is_err());
        let too_low = RatingRequest { lesson_id: 1, stars: 0 };
        assert!(too_low.validate().is_err());
    }

    #[test]
    fn register_rejects_malformed_email() {
        let request = RegisterRequest {
            full_name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
