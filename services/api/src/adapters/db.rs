//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CoursePlatformStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_platform_core::domain::{
    Comment, Course, CourseChanges, DbId, Enrollment, Lesson, LessonChanges, NewComment,
    NewCourse, NewLesson, NewUser, Page, Rating, User, UserChanges,
};
use course_platform_core::ports::{CoursePlatformStore, PortError, PortResult};
use course_platform_core::reporting::{
    GroupAverage, GroupCount, LessonRatingSummary, PlatformTotals,
};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CoursePlatformStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Column lists shared across queries to avoid repetition.
const USER_COLUMNS: &str = "id, full_name, email, password_hash, is_active, is_admin";
const COURSE_COLUMNS: &str = "id, title, description, author_id, created_at";
const LESSON_COLUMNS: &str = r#"id, course_id, title, video_url, content, "order""#;
const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, enrolled_at";
const COMMENT_COLUMNS: &str = "id, user_id, lesson_id, text, created_at";
const RATING_COLUMNS: &str = "id, user_id, lesson_id, stars";

//=========================================================================================
// Error Translation
//=========================================================================================

/// Maps constraint violations onto the port taxonomy; everything else is unexpected.
fn classify(err: sqlx::Error, duplicate_message: &str) -> PortError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => return PortError::Duplicate(duplicate_message.to_string()),
            // check_violation
            Some("23514") => {
                return PortError::Validation(format!(
                    "Value violates constraint {}",
                    db_err.constraint().unwrap_or("unknown")
                ))
            }
            // foreign_key_violation
            Some("23503") => {
                return PortError::Validation("Referenced record does not exist".to_string())
            }
            _ => {}
        }
    }
    unexpected(err)
}

fn unexpected(err: sqlx::Error) -> PortError {
    PortError::Unexpected(err.to_string())
}

fn expect_deleted(rows_affected: u64, entity: &'static str, id: DbId) -> PortResult<()> {
    if rows_affected == 0 {
        Err(PortError::not_found(entity, id))
    } else {
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    full_name: String,
    email: String,
    password_hash: String,
    is_active: bool,
    is_admin: bool,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            is_active: self.is_active,
            is_admin: self.is_admin,
        }
    }
}

#[derive(FromRow)]
struct CourseRecord {
    id: i64,
    title: String,
    description: String,
    author_id: i64,
    created_at: DateTime<Utc>,
}
impl CourseRecord {
    fn to_domain(self) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
            author_id: self.author_id,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct LessonRecord {
    id: i64,
    course_id: i64,
    title: String,
    video_url: String,
    content: String,
    order: i32,
}
impl LessonRecord {
    fn to_domain(self) -> Lesson {
        Lesson {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            video_url: self.video_url,
            content: self.content,
            order: self.order,
        }
    }
}

#[derive(FromRow)]
struct EnrollmentRecord {
    id: i64,
    user_id: i64,
    course_id: i64,
    enrolled_at: DateTime<Utc>,
}
impl EnrollmentRecord {
    fn to_domain(self) -> Enrollment {
        Enrollment {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            enrolled_at: self.enrolled_at,
        }
    }
}

#[derive(FromRow)]
struct CommentRecord {
    id: i64,
    user_id: i64,
    lesson_id: i64,
    text: String,
    created_at: DateTime<Utc>,
}
impl CommentRecord {
    fn to_domain(self) -> Comment {
        Comment {
            id: self.id,
            user_id: self.user_id,
            lesson_id: self.lesson_id,
            text: self.text,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct RatingRecord {
    id: i64,
    user_id: i64,
    lesson_id: i64,
    stars: i32,
}
impl RatingRecord {
    fn to_domain(self) -> Rating {
        Rating {
            id: self.id,
            user_id: self.user_id,
            lesson_id: self.lesson_id,
            stars: self.stars,
        }
    }
}

#[derive(FromRow)]
struct GroupCountRecord {
    id: i64,
    count: i64,
}

#[derive(FromRow)]
struct GroupAverageRecord {
    id: i64,
    average: f64,
}

#[derive(FromRow)]
struct RatingSummaryRecord {
    lesson_id: i64,
    average: Option<f64>,
    count: i64,
}
impl RatingSummaryRecord {
    fn to_domain(self) -> LessonRatingSummary {
        LessonRatingSummary {
            lesson_id: self.lesson_id,
            average: self.average,
            count: self.count,
        }
    }
}

#[derive(FromRow)]
struct TotalsRecord {
    users: i64,
    courses: i64,
    lessons: i64,
    enrollments: i64,
    comments: i64,
    ratings: i64,
}

impl DbAdapter {
    async fn grouped_counts(&self, sql: &str) -> PortResult<Vec<GroupCount>> {
        let records = sqlx::query_as::<_, GroupCountRecord>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records
            .into_iter()
            .map(|r| GroupCount {
                id: r.id,
                count: r.count,
            })
            .collect())
    }
}

//=========================================================================================
// `CoursePlatformStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CoursePlatformStore for DbAdapter {
    // --- Users ---

    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let query = format!(
            "INSERT INTO users (full_name, email, password_hash, is_active, is_admin) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let record = sqlx::query_as::<_, UserRecord>(&query)
            .bind(&new_user.full_name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.is_active)
            .bind(new_user.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Email already registered"))?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: DbId) -> PortResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRecord>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(UserRecord::to_domain)
            .ok_or_else(|| PortError::not_found("User", user_id))
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let record = sqlx::query_as::<_, UserRecord>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.map(UserRecord::to_domain))
    }

    async fn list_users(&self, page: Page) -> PortResult<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2");
        let records = sqlx::query_as::<_, UserRecord>(&query)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(UserRecord::to_domain).collect())
    }

    async fn list_users_by_ids(&self, user_ids: &[DbId]) -> PortResult<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1) ORDER BY id");
        let records = sqlx::query_as::<_, UserRecord>(&query)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(UserRecord::to_domain).collect())
    }

    async fn update_user(&self, user_id: DbId, changes: UserChanges) -> PortResult<User> {
        let query = format!(
            "UPDATE users SET \
                full_name = COALESCE($2, full_name), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                is_active = COALESCE($5, is_active), \
                is_admin = COALESCE($6, is_admin) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRecord>(&query)
            .bind(user_id)
            .bind(changes.full_name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.is_active)
            .bind(changes.is_admin)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Email already in use"))?
            .map(UserRecord::to_domain)
            .ok_or_else(|| PortError::not_found("User", user_id))
    }

    async fn delete_user(&self, user_id: DbId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        expect_deleted(result.rows_affected(), "User", user_id)
    }

    // --- Courses ---

    async fn create_course(&self, new_course: NewCourse) -> PortResult<Course> {
        let query = format!(
            "INSERT INTO courses (title, description, author_id) VALUES ($1, $2, $3) \
             RETURNING {COURSE_COLUMNS}"
        );
        let record = sqlx::query_as::<_, CourseRecord>(&query)
            .bind(&new_course.title)
            .bind(&new_course.description)
            .bind(new_course.author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Course already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_course(&self, course_id: DbId) -> PortResult<Course> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, CourseRecord>(&query)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(CourseRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Course", course_id))
    }

    async fn list_courses(&self, search: Option<&str>, page: Page) -> PortResult<Vec<Course>> {
        let query = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1) \
             ORDER BY id OFFSET $2 LIMIT $3"
        );
        let records = sqlx::query_as::<_, CourseRecord>(&query)
            .bind(search.map(|s| format!("%{s}%")))
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(CourseRecord::to_domain).collect())
    }

    async fn update_course(&self, course_id: DbId, changes: CourseChanges) -> PortResult<Course> {
        let query = format!(
            "UPDATE courses SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description) \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        sqlx::query_as::<_, CourseRecord>(&query)
            .bind(course_id)
            .bind(changes.title)
            .bind(changes.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(CourseRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Course", course_id))
    }

    async fn delete_course(&self, course_id: DbId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        expect_deleted(result.rows_affected(), "Course", course_id)
    }

    // --- Lessons ---

    async fn create_lesson(&self, new_lesson: NewLesson) -> PortResult<Lesson> {
        let query = format!(
            r#"INSERT INTO lessons (course_id, title, video_url, content, "order")
               VALUES ($1, $2, $3, $4, $5) RETURNING {LESSON_COLUMNS}"#
        );
        let record = sqlx::query_as::<_, LessonRecord>(&query)
            .bind(new_lesson.course_id)
            .bind(&new_lesson.title)
            .bind(&new_lesson.video_url)
            .bind(&new_lesson.content)
            .bind(new_lesson.order)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Lesson already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_lesson(&self, lesson_id: DbId) -> PortResult<Lesson> {
        let query = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, LessonRecord>(&query)
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(LessonRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Lesson", lesson_id))
    }

    async fn list_lessons(&self, course_id: Option<DbId>, page: Page) -> PortResult<Vec<Lesson>> {
        let query = format!(
            r#"SELECT {LESSON_COLUMNS} FROM lessons
               WHERE ($1::bigint IS NULL OR course_id = $1)
               ORDER BY "order", id OFFSET $2 LIMIT $3"#
        );
        let records = sqlx::query_as::<_, LessonRecord>(&query)
            .bind(course_id)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(LessonRecord::to_domain).collect())
    }

    async fn list_lessons_by_ids(&self, lesson_ids: &[DbId]) -> PortResult<Vec<Lesson>> {
        let query = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ANY($1) ORDER BY id");
        let records = sqlx::query_as::<_, LessonRecord>(&query)
            .bind(lesson_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(LessonRecord::to_domain).collect())
    }

    async fn update_lesson(&self, lesson_id: DbId, changes: LessonChanges) -> PortResult<Lesson> {
        let query = format!(
            r#"UPDATE lessons SET
                  title = COALESCE($2, title),
                  video_url = COALESCE($3, video_url),
                  content = COALESCE($4, content),
                  "order" = COALESCE($5, "order")
               WHERE id = $1 RETURNING {LESSON_COLUMNS}"#
        );
        sqlx::query_as::<_, LessonRecord>(&query)
            .bind(lesson_id)
            .bind(changes.title)
            .bind(changes.video_url)
            .bind(changes.content)
            .bind(changes.order)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(LessonRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Lesson", lesson_id))
    }

    async fn delete_lesson(&self, lesson_id: DbId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        expect_deleted(result.rows_affected(), "Lesson", lesson_id)
    }

    // --- Enrollments ---

    async fn create_enrollment(&self, user_id: DbId, course_id: DbId) -> PortResult<Enrollment> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2) \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, EnrollmentRecord>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Already enrolled in this course"))?;
        Ok(record.to_domain())
    }

    async fn find_enrollment(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> PortResult<Option<Enrollment>> {
        let query = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2"
        );
        let record = sqlx::query_as::<_, EnrollmentRecord>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.map(EnrollmentRecord::to_domain))
    }

    async fn get_enrollment(&self, enrollment_id: DbId) -> PortResult<Enrollment> {
        let query = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, EnrollmentRecord>(&query)
            .bind(enrollment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(EnrollmentRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Enrollment", enrollment_id))
    }

    async fn list_enrollments(&self, page: Page) -> PortResult<Vec<Enrollment>> {
        let query = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments ORDER BY id OFFSET $1 LIMIT $2"
        );
        let records = sqlx::query_as::<_, EnrollmentRecord>(&query)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(EnrollmentRecord::to_domain).collect())
    }

    async fn delete_enrollment(&self, enrollment_id: DbId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(enrollment_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        expect_deleted(result.rows_affected(), "Enrollment", enrollment_id)
    }

    async fn list_enrolled_courses(&self, user_id: DbId) -> PortResult<Vec<Course>> {
        let records = sqlx::query_as::<_, CourseRecord>(
            "SELECT c.id, c.title, c.description, c.author_id, c.created_at \
             FROM courses c JOIN enrollments e ON e.course_id = c.id \
             WHERE e.user_id = $1 ORDER BY c.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(CourseRecord::to_domain).collect())
    }

    async fn list_course_students(&self, course_id: DbId) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT u.id, u.full_name, u.email, u.password_hash, u.is_active, u.is_admin \
             FROM users u JOIN enrollments e ON e.user_id = u.id \
             WHERE e.course_id = $1 ORDER BY u.id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(UserRecord::to_domain).collect())
    }

    // --- Comments ---

    async fn create_comment(&self, new_comment: NewComment) -> PortResult<Comment> {
        let query = format!(
            "INSERT INTO comments (user_id, lesson_id, text) VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, CommentRecord>(&query)
            .bind(new_comment.user_id)
            .bind(new_comment.lesson_id)
            .bind(&new_comment.text)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Comment already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_comment(&self, comment_id: DbId) -> PortResult<Comment> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(CommentRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Comment", comment_id))
    }

    async fn list_lesson_comments(&self, lesson_id: DbId, page: Page) -> PortResult<Vec<Comment>> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE lesson_id = $1 \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        );
        let records = sqlx::query_as::<_, CommentRecord>(&query)
            .bind(lesson_id)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(CommentRecord::to_domain).collect())
    }

    async fn update_comment_text(&self, comment_id: DbId, text: &str) -> PortResult<Comment> {
        let query =
            format!("UPDATE comments SET text = $2 WHERE id = $1 RETURNING {COMMENT_COLUMNS}");
        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(comment_id)
            .bind(text)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(CommentRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Comment", comment_id))
    }

    async fn delete_comment(&self, comment_id: DbId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        expect_deleted(result.rows_affected(), "Comment", comment_id)
    }

    // --- Ratings ---

    async fn upsert_rating(
        &self,
        user_id: DbId,
        lesson_id: DbId,
        stars: i32,
    ) -> PortResult<Rating> {
        let query = format!(
            "INSERT INTO ratings (user_id, lesson_id, stars) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET stars = EXCLUDED.stars \
             RETURNING {RATING_COLUMNS}"
        );
        let record = sqlx::query_as::<_, RatingRecord>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(stars)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Rating already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_rating(&self, rating_id: DbId) -> PortResult<Rating> {
        let query = format!("SELECT {RATING_COLUMNS} FROM ratings WHERE id = $1");
        sqlx::query_as::<_, RatingRecord>(&query)
            .bind(rating_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(RatingRecord::to_domain)
            .ok_or_else(|| PortError::not_found("Rating", rating_id))
    }

    async fn list_lesson_ratings(&self, lesson_id: DbId, page: Page) -> PortResult<Vec<Rating>> {
        let query = format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE lesson_id = $1 \
             ORDER BY id OFFSET $2 LIMIT $3"
        );
        let records = sqlx::query_as::<_, RatingRecord>(&query)
            .bind(lesson_id)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(RatingRecord::to_domain).collect())
    }

    async fn list_user_ratings(&self, user_id: DbId, page: Page) -> PortResult<Vec<Rating>> {
        let query = format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE user_id = $1 \
             ORDER BY id OFFSET $2 LIMIT $3"
        );
        let records = sqlx::query_as::<_, RatingRecord>(&query)
            .bind(user_id)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(RatingRecord::to_domain).collect())
    }

    async fn delete_rating(&self, rating_id: DbId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(rating_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        expect_deleted(result.rows_affected(), "Rating", rating_id)
    }

    async fn lesson_rating_summary(&self, lesson_id: DbId) -> PortResult<LessonRatingSummary> {
        let record = sqlx::query_as::<_, RatingSummaryRecord>(
            "SELECT $1::bigint AS lesson_id, AVG(stars)::float8 AS average, COUNT(*) AS count \
             FROM ratings WHERE lesson_id = $1",
        )
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    // --- Aggregation inputs ---

    async fn course_enrollment_counts(&self) -> PortResult<Vec<GroupCount>> {
        self.grouped_counts(
            "SELECT course_id AS id, COUNT(*) AS count FROM enrollments GROUP BY course_id",
        )
        .await
    }

    async fn course_lesson_counts(&self) -> PortResult<Vec<GroupCount>> {
        self.grouped_counts(
            "SELECT course_id AS id, COUNT(*) AS count FROM lessons GROUP BY course_id",
        )
        .await
    }

    async fn course_rating_averages(&self) -> PortResult<Vec<GroupAverage>> {
        let records = sqlx::query_as::<_, GroupAverageRecord>(
            "SELECT l.course_id AS id, AVG(r.stars)::float8 AS average \
             FROM ratings r JOIN lessons l ON l.id = r.lesson_id \
             GROUP BY l.course_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records
            .into_iter()
            .map(|r| GroupAverage {
                id: r.id,
                average: r.average,
            })
            .collect())
    }

    async fn user_enrollment_counts(&self) -> PortResult<Vec<GroupCount>> {
        self.grouped_counts(
            "SELECT user_id AS id, COUNT(*) AS count FROM enrollments GROUP BY user_id",
        )
        .await
    }

    async fn user_comment_counts(&self) -> PortResult<Vec<GroupCount>> {
        self.grouped_counts(
            "SELECT user_id AS id, COUNT(*) AS count FROM comments GROUP BY user_id",
        )
        .await
    }

    async fn user_rating_counts(&self) -> PortResult<Vec<GroupCount>> {
        self.grouped_counts("SELECT user_id AS id, COUNT(*) AS count FROM ratings GROUP BY user_id")
            .await
    }

    async fn lesson_rating_summaries(&self) -> PortResult<Vec<LessonRatingSummary>> {
        let records = sqlx::query_as::<_, RatingSummaryRecord>(
            "SELECT lesson_id, AVG(stars)::float8 AS average, COUNT(*) AS count \
             FROM ratings GROUP BY lesson_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(RatingSummaryRecord::to_domain).collect())
    }

    async fn all_user_ids(&self) -> PortResult<Vec<DbId>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn platform_totals(&self) -> PortResult<PlatformTotals> {
        let record = sqlx::query_as::<_, TotalsRecord>(
            "SELECT \
                (SELECT COUNT(*) FROM users) AS users, \
                (SELECT COUNT(*) FROM courses) AS courses, \
                (SELECT COUNT(*) FROM lessons) AS lessons, \
                (SELECT COUNT(*) FROM enrollments) AS enrollments, \
                (SELECT COUNT(*) FROM comments) AS comments, \
                (SELECT COUNT(*) FROM ratings) AS ratings",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(PlatformTotals {
            users: record.users,
            courses: record.courses,
            lessons: record.lessons,
            enrollments: record.enrollments,
            comments: record.comments,
            ratings: record.ratings,
        })
    }
}
