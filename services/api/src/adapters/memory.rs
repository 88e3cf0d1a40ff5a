//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `CoursePlatformStore` port. It mirrors the
//! PostgreSQL schema rules (unique keys, foreign keys, cascading deletes and the
//! stars check) so the HTTP layer behaves the same against either store.
//! Selected with `DATABASE_URL=memory://` and used by the integration tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use course_platform_core::domain::{
    validate_stars, Comment, Course, CourseChanges, DbId, Enrollment, Lesson, LessonChanges,
    NewComment, NewCourse, NewLesson, NewUser, Page, Rating, User, UserChanges,
};
use course_platform_core::ports::{CoursePlatformStore, PortError, PortResult};
use course_platform_core::reporting::{
    GroupAverage, GroupCount, LessonRatingSummary, PlatformTotals,
};
use tokio::sync::RwLock;

//=========================================================================================
// Tables
//=========================================================================================

/// Rows keyed by id, plus the id sequence for the table.
struct Table<T> {
    rows: BTreeMap<DbId, T>,
    next_id: DbId,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(DbId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: DbId, entity: &'static str) -> PortResult<T> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found(entity, id))
    }

    fn contains(&self, id: DbId) -> bool {
        self.rows.contains_key(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn len(&self) -> i64 {
        self.rows.len() as i64
    }
}

struct Tables {
    users: Table<User>,
    courses: Table<Course>,
    lessons: Table<Lesson>,
    enrollments: Table<Enrollment>,
    comments: Table<Comment>,
    ratings: Table<Rating>,
}

fn missing_reference() -> PortError {
    PortError::Validation("Referenced record does not exist".to_string())
}

fn group_count<'a, T: 'a>(
    rows: impl Iterator<Item = &'a T>,
    key: impl Fn(&T) -> DbId,
) -> Vec<GroupCount> {
    let mut counts: BTreeMap<DbId, i64> = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(id, count)| GroupCount { id, count })
        .collect()
}

fn summarize(lesson_id: DbId, stars: &[i32]) -> LessonRatingSummary {
    let count = stars.len() as i64;
    let average = if stars.is_empty() {
        None
    } else {
        Some(stars.iter().map(|&s| f64::from(s)).sum::<f64>() / count as f64)
    };
    LessonRatingSummary {
        lesson_id,
        average,
        count,
    }
}

impl Tables {
    fn new() -> Self {
        Self {
            users: Table::new(),
            courses: Table::new(),
            lessons: Table::new(),
            enrollments: Table::new(),
            comments: Table::new(),
            ratings: Table::new(),
        }
    }

    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn remove_lesson(&mut self, lesson_id: DbId) {
        self.lessons.rows.remove(&lesson_id);
        self.comments.rows.retain(|_, c| c.lesson_id != lesson_id);
        self.ratings.rows.retain(|_, r| r.lesson_id != lesson_id);
    }

    fn remove_course(&mut self, course_id: DbId) {
        self.courses.rows.remove(&course_id);
        let lesson_ids: Vec<DbId> = self
            .lessons
            .values()
            .filter(|l| l.course_id == course_id)
            .map(|l| l.id)
            .collect();
        for lesson_id in lesson_ids {
            self.remove_lesson(lesson_id);
        }
        self.enrollments.rows.retain(|_, e| e.course_id != course_id);
    }

    fn remove_user(&mut self, user_id: DbId) {
        self.users.rows.remove(&user_id);
        let course_ids: Vec<DbId> = self
            .courses
            .values()
            .filter(|c| c.author_id == user_id)
            .map(|c| c.id)
            .collect();
        for course_id in course_ids {
            self.remove_course(course_id);
        }
        self.enrollments.rows.retain(|_, e| e.user_id != user_id);
        self.comments.rows.retain(|_, c| c.user_id != user_id);
        self.ratings.rows.retain(|_, r| r.user_id != user_id);
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A `CoursePlatformStore` kept entirely in memory behind a single lock.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoursePlatformStore for InMemoryStore {
    // --- Users ---

    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&new_user.email, None) {
            return Err(PortError::Duplicate("Email already registered".to_string()));
        }
        Ok(tables.users.insert_with(|id| User {
            id,
            full_name: new_user.full_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_active: new_user.is_active,
            is_admin: new_user.is_admin,
        }))
    }

    async fn get_user(&self, user_id: DbId) -> PortResult<User> {
        self.tables.read().await.users.get(user_id, "User")
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<User>> {
        let tables = self.tables.read().await;
        let found = tables.users.values().find(|u| u.email == email).cloned();
        Ok(found)
    }

    async fn list_users(&self, page: Page) -> PortResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(page.slice(tables.users.values().cloned()))
    }

    async fn list_users_by_ids(&self, user_ids: &[DbId]) -> PortResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| user_ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn update_user(&self, user_id: DbId, changes: UserChanges) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(user_id)) {
                return Err(PortError::Duplicate("Email already in use".to_string()));
            }
        }
        let user = tables
            .users
            .rows
            .get_mut(&user_id)
            .ok_or_else(|| PortError::not_found("User", user_id))?;
        changes.apply_to(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: DbId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains(user_id) {
            return Err(PortError::not_found("User", user_id));
        }
        tables.remove_user(user_id);
        Ok(())
    }

    // --- Courses ---

    async fn create_course(&self, new_course: NewCourse) -> PortResult<Course> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains(new_course.author_id) {
            return Err(missing_reference());
        }
        Ok(tables.courses.insert_with(|id| Course {
            id,
            title: new_course.title,
            description: new_course.description,
            author_id: new_course.author_id,
            created_at: Utc::now(),
        }))
    }

    async fn get_course(&self, course_id: DbId) -> PortResult<Course> {
        self.tables.read().await.courses.get(course_id, "Course")
    }

    async fn list_courses(&self, search: Option<&str>, page: Page) -> PortResult<Vec<Course>> {
        let needle = search.map(str::to_lowercase);
        let tables = self.tables.read().await;
        let matching = tables.courses.values().filter(|c| match &needle {
            Some(needle) => {
                c.title.to_lowercase().contains(needle)
                    || c.description.to_lowercase().contains(needle)
            }
            None => true,
        });
        Ok(page.slice(matching.cloned()))
    }

    async fn update_course(&self, course_id: DbId, changes: CourseChanges) -> PortResult<Course> {
        let mut tables = self.tables.write().await;
        let course = tables
            .courses
            .rows
            .get_mut(&course_id)
            .ok_or_else(|| PortError::not_found("Course", course_id))?;
        changes.apply_to(course);
        Ok(course.clone())
    }

    async fn delete_course(&self, course_id: DbId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.courses.contains(course_id) {
            return Err(PortError::not_found("Course", course_id));
        }
        tables.remove_course(course_id);
        Ok(())
    }

    // --- Lessons ---

    async fn create_lesson(&self, new_lesson: NewLesson) -> PortResult<Lesson> {
        let mut tables = self.tables.write().await;
        if !tables.courses.contains(new_lesson.course_id) {
            return Err(missing_reference());
        }
        Ok(tables.lessons.insert_with(|id| Lesson {
            id,
            course_id: new_lesson.course_id,
            title: new_lesson.title,
            video_url: new_lesson.video_url,
            content: new_lesson.content,
            order: new_lesson.order,
        }))
    }

    async fn get_lesson(&self, lesson_id: DbId) -> PortResult<Lesson> {
        self.tables.read().await.lessons.get(lesson_id, "Lesson")
    }

    async fn list_lessons(&self, course_id: Option<DbId>, page: Page) -> PortResult<Vec<Lesson>> {
        let tables = self.tables.read().await;
        let mut lessons: Vec<Lesson> = tables
            .lessons
            .values()
            .filter(|l| course_id.map_or(true, |id| l.course_id == id))
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.order, l.id));
        Ok(page.slice(lessons))
    }

    async fn list_lessons_by_ids(&self, lesson_ids: &[DbId]) -> PortResult<Vec<Lesson>> {
        let tables = self.tables.read().await;
        Ok(tables
            .lessons
            .values()
            .filter(|l| lesson_ids.contains(&l.id))
            .cloned()
            .collect())
    }

    async fn update_lesson(&self, lesson_id: DbId, changes: LessonChanges) -> PortResult<Lesson> {
        let mut tables = self.tables.write().await;
        let lesson = tables
            .lessons
            .rows
            .get_mut(&lesson_id)
            .ok_or_else(|| PortError::not_found("Lesson", lesson_id))?;
        changes.apply_to(lesson);
        Ok(lesson.clone())
    }

    async fn delete_lesson(&self, lesson_id: DbId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.lessons.contains(lesson_id) {
            return Err(PortError::not_found("Lesson", lesson_id));
        }
        tables.remove_lesson(lesson_id);
        Ok(())
    }

    // --- Enrollments ---

    async fn create_enrollment(&self, user_id: DbId, course_id: DbId) -> PortResult<Enrollment> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains(user_id) || !tables.courses.contains(course_id) {
            return Err(missing_reference());
        }
        if tables
            .enrollments
            .values()
            .any(|e| e.user_id == user_id && e.course_id == course_id)
        {
            return Err(PortError::Duplicate(
                "Already enrolled in this course".to_string(),
            ));
        }
        Ok(tables.enrollments.insert_with(|id| Enrollment {
            id,
            user_id,
            course_id,
            enrolled_at: Utc::now(),
        }))
    }

    async fn find_enrollment(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> PortResult<Option<Enrollment>> {
        let tables = self.tables.read().await;
        let found = tables
            .enrollments
            .values()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned();
        Ok(found)
    }

    async fn get_enrollment(&self, enrollment_id: DbId) -> PortResult<Enrollment> {
        self.tables
            .read()
            .await
            .enrollments
            .get(enrollment_id, "Enrollment")
    }

    async fn list_enrollments(&self, page: Page) -> PortResult<Vec<Enrollment>> {
        let tables = self.tables.read().await;
        Ok(page.slice(tables.enrollments.values().cloned()))
    }

    async fn delete_enrollment(&self, enrollment_id: DbId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .enrollments
            .rows
            .remove(&enrollment_id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Enrollment", enrollment_id))
    }

    async fn list_enrolled_courses(&self, user_id: DbId) -> PortResult<Vec<Course>> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .filter(|c| {
                tables
                    .enrollments
                    .values()
                    .any(|e| e.user_id == user_id && e.course_id == c.id)
            })
            .cloned()
            .collect())
    }

    async fn list_course_students(&self, course_id: DbId) -> PortResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| {
                tables
                    .enrollments
                    .values()
                    .any(|e| e.course_id == course_id && e.user_id == u.id)
            })
            .cloned()
            .collect())
    }

    // --- Comments ---

    async fn create_comment(&self, new_comment: NewComment) -> PortResult<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains(new_comment.user_id)
            || !tables.lessons.contains(new_comment.lesson_id)
        {
            return Err(missing_reference());
        }
        Ok(tables.comments.insert_with(|id| Comment {
            id,
            user_id: new_comment.user_id,
            lesson_id: new_comment.lesson_id,
            text: new_comment.text,
            created_at: Utc::now(),
        }))
    }

    async fn get_comment(&self, comment_id: DbId) -> PortResult<Comment> {
        self.tables.read().await.comments.get(comment_id, "Comment")
    }

    async fn list_lesson_comments(&self, lesson_id: DbId, page: Page) -> PortResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.lesson_id == lesson_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page.slice(comments))
    }

    async fn update_comment_text(&self, comment_id: DbId, text: &str) -> PortResult<Comment> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .rows
            .get_mut(&comment_id)
            .ok_or_else(|| PortError::not_found("Comment", comment_id))?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, comment_id: DbId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .rows
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Comment", comment_id))
    }

    // --- Ratings ---

    async fn upsert_rating(
        &self,
        user_id: DbId,
        lesson_id: DbId,
        stars: i32,
    ) -> PortResult<Rating> {
        let stars = validate_stars(stars)?;
        let mut tables = self.tables.write().await;
        if !tables.users.contains(user_id) || !tables.lessons.contains(lesson_id) {
            return Err(missing_reference());
        }
        let existing = tables
            .ratings
            .rows
            .values_mut()
            .find(|r| r.user_id == user_id && r.lesson_id == lesson_id);
        if let Some(rating) = existing {
            rating.stars = stars;
            return Ok(rating.clone());
        }
        Ok(tables.ratings.insert_with(|id| Rating {
            id,
            user_id,
            lesson_id,
            stars,
        }))
    }

    async fn get_rating(&self, rating_id: DbId) -> PortResult<Rating> {
        self.tables.read().await.ratings.get(rating_id, "Rating")
    }

    async fn list_lesson_ratings(&self, lesson_id: DbId, page: Page) -> PortResult<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(page.slice(
            tables
                .ratings
                .values()
                .filter(|r| r.lesson_id == lesson_id)
                .cloned(),
        ))
    }

    async fn list_user_ratings(&self, user_id: DbId, page: Page) -> PortResult<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(page.slice(
            tables
                .ratings
                .values()
                .filter(|r| r.user_id == user_id)
                .cloned(),
        ))
    }

    async fn delete_rating(&self, rating_id: DbId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .ratings
            .rows
            .remove(&rating_id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Rating", rating_id))
    }

    async fn lesson_rating_summary(&self, lesson_id: DbId) -> PortResult<LessonRatingSummary> {
        let tables = self.tables.read().await;
        let stars: Vec<i32> = tables
            .ratings
            .values()
            .filter(|r| r.lesson_id == lesson_id)
            .map(|r| r.stars)
            .collect();
        Ok(summarize(lesson_id, &stars))
    }

    // --- Aggregation inputs ---

    async fn course_enrollment_counts(&self) -> PortResult<Vec<GroupCount>> {
        let tables = self.tables.read().await;
        Ok(group_count(tables.enrollments.values(), |e| e.course_id))
    }

    async fn course_lesson_counts(&self) -> PortResult<Vec<GroupCount>> {
        let tables = self.tables.read().await;
        Ok(group_count(tables.lessons.values(), |l| l.course_id))
    }

    async fn course_rating_averages(&self) -> PortResult<Vec<GroupAverage>> {
        let tables = self.tables.read().await;
        let mut sums: BTreeMap<DbId, (i64, i64)> = BTreeMap::new();
        for rating in tables.ratings.values() {
            if let Some(lesson) = tables.lessons.rows.get(&rating.lesson_id) {
                let entry = sums.entry(lesson.course_id).or_insert((0, 0));
                entry.0 += i64::from(rating.stars);
                entry.1 += 1;
            }
        }
        Ok(sums
            .into_iter()
            .map(|(id, (total, count))| GroupAverage {
                id,
                average: total as f64 / count as f64,
            })
            .collect())
    }

    async fn user_enrollment_counts(&self) -> PortResult<Vec<GroupCount>> {
        let tables = self.tables.read().await;
        Ok(group_count(tables.enrollments.values(), |e| e.user_id))
    }

    async fn user_comment_counts(&self) -> PortResult<Vec<GroupCount>> {
        let tables = self.tables.read().await;
        Ok(group_count(tables.comments.values(), |c| c.user_id))
    }

    async fn user_rating_counts(&self) -> PortResult<Vec<GroupCount>> {
        let tables = self.tables.read().await;
        Ok(group_count(tables.ratings.values(), |r| r.user_id))
    }

    async fn lesson_rating_summaries(&self) -> PortResult<Vec<LessonRatingSummary>> {
        let tables = self.tables.read().await;
        let mut by_lesson: HashMap<DbId, Vec<i32>> = HashMap::new();
        for rating in tables.ratings.values() {
            by_lesson.entry(rating.lesson_id).or_default().push(rating.stars);
        }
        Ok(by_lesson
            .into_iter()
            .map(|(lesson_id, stars)| summarize(lesson_id, &stars))
            .collect())
    }

    async fn all_user_ids(&self) -> PortResult<Vec<DbId>> {
        let tables = self.tables.read().await;
        Ok(tables.users.rows.keys().copied().collect())
    }

    async fn platform_totals(&self) -> PortResult<PlatformTotals> {
        let tables = self.tables.read().await;
        Ok(PlatformTotals {
            users: tables.users.len(),
            courses: tables.courses.len(),
            lessons: tables.lessons.len(),
            enrollments: tables.enrollments.len(),
            comments: tables.comments.len(),
            ratings: tables.ratings.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &InMemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                full_name: "Test User".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                is_active: true,
                is_admin: false,
            })
            .await
            .unwrap()
    }

    async fn seed_lesson(store: &InMemoryStore, author_id: DbId) -> (Course, Lesson) {
        let course = store
            .create_course(NewCourse {
                title: "Rust".to_string(),
                description: "Systems programming".to_string(),
                author_id,
            })
            .await
            .unwrap();
        let lesson = store
            .create_lesson(NewLesson {
                course_id: course.id,
                title: "Ownership".to_string(),
                video_url: String::new(),
                content: String::new(),
                order: 1,
            })
            .await
            .unwrap();
        (course, lesson)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        seed_user(&store, "a@example.com").await;
        let err = store
            .create_user(NewUser {
                full_name: "Other".to_string(),
                email: "a@example.com".to_string(),
                password_hash: "hash".to_string(),
                is_active: true,
                is_admin: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Duplicate(_)));
    }

    #[tokio::test]
    async fn lookups_by_natural_key() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "a@example.com").await;
        let (course, _) = seed_lesson(&store, user.id).await;
        store.create_enrollment(user.id, course.id).await.unwrap();

        let found = store.find_user_by_email("a@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.find_user_by_email("b@example.com").await.unwrap().is_none());

        let enrollment = store.find_enrollment(user.id, course.id).await.unwrap();
        assert_eq!(enrollment.map(|e| e.course_id), Some(course.id));
        assert!(store.find_enrollment(user.id, course.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rating_upsert_keeps_one_row_per_pair() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "a@example.com").await;
        let (_, lesson) = seed_lesson(&store, user.id).await;

        let first = store.upsert_rating(user.id, lesson.id, 3).await.unwrap();
        let second = store.upsert_rating(user.id, lesson.id, 5).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.stars, 5);
        assert_eq!(store.platform_totals().await.unwrap().ratings, 1);
        assert!(matches!(
            store.upsert_rating(user.id, lesson.id, 6).await,
            Err(PortError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn deleting_a_course_cascades_to_its_children() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author@example.com").await;
        let student = seed_user(&store, "student@example.com").await;
        let (course, lesson) = seed_lesson(&store, author.id).await;
        store.create_enrollment(student.id, course.id).await.unwrap();
        store
            .create_comment(NewComment {
                user_id: student.id,
                lesson_id: lesson.id,
                text: "Nice".to_string(),
            })
            .await
            .unwrap();
        store.upsert_rating(student.id, lesson.id, 4).await.unwrap();

        store.delete_course(course.id).await.unwrap();

        let totals = store.platform_totals().await.unwrap();
        assert_eq!(totals.courses, 0);
        assert_eq!(totals.lessons, 0);
        assert_eq!(totals.enrollments, 0);
        assert_eq!(totals.comments, 0);
        assert_eq!(totals.ratings, 0);
        assert_eq!(totals.users, 2);
    }

    #[tokio::test]
    async fn comments_are_listed_newest_first() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "a@example.com").await;
        let (_, lesson) = seed_lesson(&store, user.id).await;
        for text in ["first", "second"] {
            store
                .create_comment(NewComment {
                    user_id: user.id,
                    lesson_id: lesson.id,
                    text: text.to_string(),
                })
                .await
                .unwrap();
        }

        let comments = store
            .list_lesson_comments(lesson.id, Page::default())
            .await
            .unwrap();
        assert_eq!(comments[0].text, "second");
        assert_eq!(comments[1].text, "first");
    }

    #[tokio::test]
    async fn course_search_is_case_insensitive() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "a@example.com").await;
        seed_lesson(&store, user.id).await;

        let hits = store
            .list_courses(Some("SYSTEMS"), Page::default())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        let misses = store
            .list_courses(Some("python"), Page::default())
            .await
            .unwrap();
        assert!(misses.is_empty());
    }
}
