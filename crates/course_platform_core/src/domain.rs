//! crates/course_platform_core/src/domain.rs
//!
//! Defines the pure, core data structures for the course platform.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

use crate::ports::{PortError, PortResult};

/// Primary key type shared by every entity.
pub type DbId = i64;

/// Lowest accepted rating.
pub const MIN_STARS: i32 = 1;
/// Highest accepted rating.
pub const MAX_STARS: i32 = 5;

//=========================================================================================
// Users
//=========================================================================================

/// A registered account. Carries the password hash, so it never leaves the
/// service without being mapped to a response type first.
#[derive(Debug, Clone)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
}

/// Partial update of a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

impl UserChanges {
    /// Copies every present field onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(is_admin) = self.is_admin {
            user.is_admin = is_admin;
        }
    }
}

//=========================================================================================
// Courses and Lessons
//=========================================================================================

#[derive(Debug, Clone)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub author_id: DbId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub author_id: DbId,
}

#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CourseChanges {
    pub fn apply_to(self, course: &mut Course) {
        if let Some(title) = self.title {
            course.title = title;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
    }
}

/// A single lesson. `order` sorts lessons inside their course and is not unique.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub video_url: String,
    pub content: String,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewLesson {
    pub course_id: DbId,
    pub title: String,
    pub video_url: String,
    pub content: String,
    pub order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct LessonChanges {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub content: Option<String>,
    pub order: Option<i32>,
}

impl LessonChanges {
    pub fn apply_to(self, lesson: &mut Lesson) {
        if let Some(title) = self.title {
            lesson.title = title;
        }
        if let Some(video_url) = self.video_url {
            lesson.video_url = video_url;
        }
        if let Some(content) = self.content {
            lesson.content = content;
        }
        if let Some(order) = self.order {
            lesson.order = order;
        }
    }
}

//=========================================================================================
// Enrollments, Comments and Ratings
//=========================================================================================

/// Grants `user_id` access to the lessons of `course_id`.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Rating {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub stars: i32,
}

/// Rejects star values outside `MIN_STARS..=MAX_STARS`.
pub fn validate_stars(stars: i32) -> PortResult<i32> {
    if (MIN_STARS..=MAX_STARS).contains(&stars) {
        Ok(stars)
    } else {
        Err(PortError::Validation(format!(
            "Stars must be between {MIN_STARS} and {MAX_STARS}"
        )))
    }
}

//=========================================================================================
// Listing helpers
//=========================================================================================

/// Offset pagination as exposed by the list endpoints (`?skip=&limit=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Builds a page from optional query values, clamping negatives to zero.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).max(0),
        }
    }

    /// Every row, for nested listings that are not paginated.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: i64::MAX,
        }
    }

    /// Applies the page to an already ordered iterator.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
