//! services/api/src/reporting.rs
//!
//! The aggregation reporter. Fetches independent grouped counts from the store
//! and hands them to the pure merge and ranking functions in the core crate.

use std::sync::Arc;

use course_platform_core::reporting::{
    build_course_stats, build_user_stats, lesson_average_or_none, lesson_average_or_zero,
    order_by_rank, rank_active_users, rank_popular_lessons, CourseStats, PlatformTotals,
    UserActivity, UserStats,
};
use course_platform_core::{CoursePlatformStore, DbId, Lesson, Page, PortResult, User};
use tracing::instrument;

/// Default number of rows returned by the popular-lessons and active-users reports.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

#[derive(Clone)]
pub struct Reporter {
    store: Arc<dyn CoursePlatformStore>,
}

impl Reporter {
    pub fn new(store: Arc<dyn CoursePlatformStore>) -> Self {
        Self { store }
    }

    /// Per-course student and lesson counts plus the mean rating, for one page of courses.
    #[instrument(skip(self))]
    pub async fn course_stats(&self, page: Page) -> PortResult<Vec<CourseStats>> {
        let courses = self.store.list_courses(None, page).await?;
        let enrollments = self.store.course_enrollment_counts().await?;
        let lessons = self.store.course_lesson_counts().await?;
        let averages = self.store.course_rating_averages().await?;
        Ok(build_course_stats(&courses, &enrollments, &lessons, &averages))
    }

    /// Per-user enrollment, comment and rating counts, for one page of users.
    #[instrument(skip(self))]
    pub async fn user_stats(&self, page: Page) -> PortResult<Vec<UserStats>> {
        let users = self.store.list_users(page).await?;
        let enrollments = self.store.user_enrollment_counts().await?;
        let comments = self.store.user_comment_counts().await?;
        let ratings = self.store.user_rating_counts().await?;
        Ok(build_user_stats(&users, &enrollments, &comments, &ratings))
    }

    /// Rated lessons ordered by average then rating count, both descending.
    #[instrument(skip(self))]
    pub async fn popular_lessons(&self, limit: usize) -> PortResult<Vec<Lesson>> {
        let summaries = self.store.lesson_rating_summaries().await?;
        let ranked: Vec<DbId> = rank_popular_lessons(summaries, limit)
            .iter()
            .map(|s| s.lesson_id)
            .collect();
        let lessons = self.store.list_lessons_by_ids(&ranked).await?;
        Ok(order_by_rank(&ranked, lessons, |l| l.id))
    }

    /// Users ordered by comments plus ratings, descending. Users with no
    /// comments or ratings are included and score zero.
    #[instrument(skip(self))]
    pub async fn active_users(&self, limit: usize) -> PortResult<Vec<User>> {
        let ranked = self.rank_activity(limit).await?;
        let ids: Vec<DbId> = ranked.iter().map(|a| a.user_id).collect();
        let users = self.store.list_users_by_ids(&ids).await?;
        Ok(order_by_rank(&ids, users, |u| u.id))
    }

    async fn rank_activity(&self, limit: usize) -> PortResult<Vec<UserActivity>> {
        let user_ids = self.store.all_user_ids().await?;
        let comments = self.store.user_comment_counts().await?;
        let ratings = self.store.user_rating_counts().await?;
        Ok(rank_active_users(&user_ids, &comments, &ratings, limit))
    }

    /// Mean stars of one lesson rounded to one decimal, `0.0` when unrated.
    /// Fails with `NotFound` when the lesson does not exist.
    pub async fn lesson_average_rating(&self, lesson_id: DbId) -> PortResult<f64> {
        self.store.get_lesson(lesson_id).await?;
        let summary = self.store.lesson_rating_summary(lesson_id).await?;
        Ok(lesson_average_or_zero(&summary))
    }

    /// The average attached to a lesson detail: `None` when unrated.
    pub async fn lesson_detail_average(&self, lesson_id: DbId) -> PortResult<Option<f64>> {
        let summary = self.store.lesson_rating_summary(lesson_id).await?;
        Ok(lesson_average_or_none(&summary))
    }

    pub async fn platform_overview(&self) -> PortResult<PlatformTotals> {
        self.store.platform_totals().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use course_platform_core::{NewComment, NewCourse, NewLesson, NewUser, UserChanges};

    async fn user(store: &InMemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                full_name: email.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                is_active: true,
                is_admin: false,
            })
            .await
            .unwrap()
    }

    async fn lesson(store: &InMemoryStore, course_id: DbId, title: &str) -> Lesson {
        store
            .create_lesson(NewLesson {
                course_id,
                title: title.to_string(),
                video_url: String::new(),
                content: String::new(),
                order: 0,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn course_stats_counts_each_child_table_independently() {
        let store = Arc::new(InMemoryStore::new());
        let author = user(&store, "author@example.com").await;
        let student = user(&store, "student@example.com").await;
        let course = store
            .create_course(NewCourse {
                title: "Rust".to_string(),
                description: String::new(),
                author_id: author.id,
            })
            .await
            .unwrap();
        let first = lesson(&store, course.id, "one").await;
        let second = lesson(&store, course.id, "two").await;
        store.create_enrollment(student.id, course.id).await.unwrap();
        store.upsert_rating(student.id, first.id, 4).await.unwrap();
        store.upsert_rating(student.id, second.id, 5).await.unwrap();

        let reporter = Reporter::new(store.clone());
        let stats = reporter.course_stats(Page::default()).await.unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_students, 1);
        assert_eq!(stats[0].total_lessons, 2);
        assert_eq!(stats[0].average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn active_users_are_not_inflated_by_joins() {
        let store = Arc::new(InMemoryStore::new());
        let busy = user(&store, "busy@example.com").await;
        let idle = user(&store, "idle@example.com").await;
        let course = store
            .create_course(NewCourse {
                title: "Rust".to_string(),
                description: String::new(),
                author_id: busy.id,
            })
            .await
            .unwrap();
        let first = lesson(&store, course.id, "one").await;
        let second = lesson(&store, course.id, "two").await;
        for text in ["a", "b", "c"] {
            store
                .create_comment(NewComment {
                    user_id: busy.id,
                    lesson_id: first.id,
                    text: text.to_string(),
                })
                .await
                .unwrap();
        }
        store.upsert_rating(busy.id, first.id, 5).await.unwrap();
        store.upsert_rating(busy.id, second.id, 3).await.unwrap();

        let reporter = Reporter::new(store.clone());
        let activity = reporter.rank_activity(10).await.unwrap();
        assert_eq!(activity[0].user_id, busy.id);
        assert_eq!(activity[0].total(), 5);
        assert_eq!(activity[1].user_id, idle.id);
        assert_eq!(activity[1].total(), 0);

        let users = reporter.active_users(1).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, busy.id);
    }

    #[tokio::test]
    async fn deactivated_users_keep_their_activity_score() {
        let store = Arc::new(InMemoryStore::new());
        let author = user(&store, "author@example.com").await;
        let departed = user(&store, "departed@example.com").await;
        let course = store
            .create_course(NewCourse {
                title: "Rust".to_string(),
                description: String::new(),
                author_id: author.id,
            })
            .await
            .unwrap();
        let first = lesson(&store, course.id, "one").await;
        store.upsert_rating(departed.id, first.id, 4).await.unwrap();
        store
            .update_user(
                departed.id,
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let reporter = Reporter::new(store.clone());
        let activity = reporter.rank_activity(10).await.unwrap();
        assert_eq!(activity[0].user_id, departed.id);
        assert_eq!(activity[0].total(), 1);
        assert_eq!(activity[1].user_id, author.id);
        assert_eq!(activity[1].total(), 0);
    }

    #[tokio::test]
    async fn unrated_lesson_average_is_zero_but_detail_is_none() {
        let store = Arc::new(InMemoryStore::new());
        let author = user(&store, "author@example.com").await;
        let course = store
            .create_course(NewCourse {
                title: "Rust".to_string(),
                description: String::new(),
                author_id: author.id,
            })
            .await
            .unwrap();
        let unrated = lesson(&store, course.id, "quiet").await;

        let reporter = Reporter::new(store.clone());
        assert_eq!(reporter.lesson_average_rating(unrated.id).await.unwrap(), 0.0);
        assert_eq!(reporter.lesson_detail_average(unrated.id).await.unwrap(), None);
        assert!(reporter.lesson_average_rating(999).await.is_err());
        assert!(reporter.popular_lessons(10).await.unwrap().is_empty());
    }
}
