//! crates/course_platform_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the course platform.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete store behind it.

use async_trait::async_trait;

use crate::domain::{
    Comment, Course, CourseChanges, DbId, Enrollment, Lesson, LessonChanges, NewComment,
    NewCourse, NewLesson, NewUser, Page, Rating, User, UserChanges,
};
use crate::reporting::{GroupAverage, GroupCount, LessonRatingSummary, PlatformTotals};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by the store, the policy evaluator and the reporter.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),
    /// A natural key is already taken (email, enrollment pair).
    #[error("{0}")]
    Duplicate(String),
    /// Missing, invalid or expired credentials.
    #[error("{0}")]
    Unauthenticated(String),
    /// Authenticated, but the access policy denied the action.
    #[error("{0}")]
    Forbidden(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        PortError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistent records for users, courses, lessons, enrollments, comments and ratings.
///
/// Every cross-entity read is an explicit call; nothing is loaded lazily.
/// Lookups by id fail with [`PortError::NotFound`], `find_*` methods return `None`.
#[async_trait]
pub trait CoursePlatformStore: Send + Sync {
    // --- Users ---
    /// Fails with [`PortError::Duplicate`] when the email is taken.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user(&self, user_id: DbId) -> PortResult<User>;

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<User>>;

    async fn list_users(&self, page: Page) -> PortResult<Vec<User>>;

    async fn list_users_by_ids(&self, user_ids: &[DbId]) -> PortResult<Vec<User>>;

    async fn update_user(&self, user_id: DbId, changes: UserChanges) -> PortResult<User>;

    /// Removes the user together with everything they authored.
    async fn delete_user(&self, user_id: DbId) -> PortResult<()>;

    // --- Courses ---
    async fn create_course(&self, new_course: NewCourse) -> PortResult<Course>;

    async fn get_course(&self, course_id: DbId) -> PortResult<Course>;

    /// Case-insensitive substring search over title and description.
    async fn list_courses(&self, search: Option<&str>, page: Page) -> PortResult<Vec<Course>>;

    async fn update_course(&self, course_id: DbId, changes: CourseChanges)
        -> PortResult<Course>;

    /// Cascades to lessons and enrollments (and through lessons to comments and ratings).
    async fn delete_course(&self, course_id: DbId) -> PortResult<()>;

    // --- Lessons ---
    async fn create_lesson(&self, new_lesson: NewLesson) -> PortResult<Lesson>;

    async fn get_lesson(&self, lesson_id: DbId) -> PortResult<Lesson>;

    /// Lessons ordered by `order`, then id.
    async fn list_lessons(&self, course_id: Option<DbId>, page: Page) -> PortResult<Vec<Lesson>>;

    async fn list_lessons_by_ids(&self, lesson_ids: &[DbId]) -> PortResult<Vec<Lesson>>;

    async fn update_lesson(&self, lesson_id: DbId, changes: LessonChanges)
        -> PortResult<Lesson>;

    /// Cascades to comments and ratings.
    async fn delete_lesson(&self, lesson_id: DbId) -> PortResult<()>;

    // --- Enrollments ---
    /// Fails with [`PortError::Duplicate`] when the pair is already enrolled.
    async fn create_enrollment(&self, user_id: DbId, course_id: DbId) -> PortResult<Enrollment>;

    async fn find_enrollment(&self, user_id: DbId, course_id: DbId)
        -> PortResult<Option<Enrollment>>;

    async fn get_enrollment(&self, enrollment_id: DbId) -> PortResult<Enrollment>;

    async fn list_enrollments(&self, page: Page) -> PortResult<Vec<Enrollment>>;

    async fn delete_enrollment(&self, enrollment_id: DbId) -> PortResult<()>;

    async fn list_enrolled_courses(&self, user_id: DbId) -> PortResult<Vec<Course>>;

    async fn list_course_students(&self, course_id: DbId) -> PortResult<Vec<User>>;

    // --- Comments ---
    async fn create_comment(&self, new_comment: NewComment) -> PortResult<Comment>;

    async fn get_comment(&self, comment_id: DbId) -> PortResult<Comment>;

    /// Newest first.
    async fn list_lesson_comments(&self, lesson_id: DbId, page: Page) -> PortResult<Vec<Comment>>;

    async fn update_comment_text(&self, comment_id: DbId, text: &str) -> PortResult<Comment>;

    async fn delete_comment(&self, comment_id: DbId) -> PortResult<()>;

    // --- Ratings ---
    /// Creates the rating, or overwrites `stars` on the existing row for the pair.
    async fn upsert_rating(&self, user_id: DbId, lesson_id: DbId, stars: i32)
        -> PortResult<Rating>;

    async fn get_rating(&self, rating_id: DbId) -> PortResult<Rating>;

    async fn list_lesson_ratings(&self, lesson_id: DbId, page: Page) -> PortResult<Vec<Rating>>;

    async fn list_user_ratings(&self, user_id: DbId, page: Page) -> PortResult<Vec<Rating>>;

    async fn delete_rating(&self, rating_id: DbId) -> PortResult<()>;

    /// Unrounded mean and count of the ratings on one lesson.
    async fn lesson_rating_summary(&self, lesson_id: DbId) -> PortResult<LessonRatingSummary>;

    // --- Aggregation inputs ---
    // Each of these is a single grouped query over one child table, so no two
    // counts ever share a join.
    async fn course_enrollment_counts(&self) -> PortResult<Vec<GroupCount>>;

    async fn course_lesson_counts(&self) -> PortResult<Vec<GroupCount>>;

    /// Mean stars per course, through the course's lessons. Courses without ratings are absent.
    async fn course_rating_averages(&self) -> PortResult<Vec<GroupAverage>>;

    async fn user_enrollment_counts(&self) -> PortResult<Vec<GroupCount>>;

    async fn user_comment_counts(&self) -> PortResult<Vec<GroupCount>>;

    async fn user_rating_counts(&self) -> PortResult<Vec<GroupCount>>;

    /// One summary per lesson that has at least one rating.
    async fn lesson_rating_summaries(&self) -> PortResult<Vec<LessonRatingSummary>>;

    /// Ids of every user, ascending.
    async fn all_user_ids(&self) -> PortResult<Vec<DbId>>;

    async fn platform_totals(&self) -> PortResult<PlatformTotals>;
}
