//! crates/course_platform_core/src/reporting.rs
//!
//! Pure half of the aggregation reporter. The store hands back one grouped
//! count per child table; the functions here merge those counts by id,
//! defaulting missing sides to zero, and rank the results.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{Course, DbId, User};

//=========================================================================================
// Store-facing aggregate rows
//=========================================================================================

/// `COUNT(*)` of child rows grouped by a parent id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCount {
    pub id: DbId,
    pub count: i64,
}

/// `AVG(stars)` grouped by a parent id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupAverage {
    pub id: DbId,
    pub average: f64,
}

/// Unrounded average and number of ratings for one lesson.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LessonRatingSummary {
    pub lesson_id: DbId,
    pub average: Option<f64>,
    pub count: i64,
}

/// Row counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformTotals {
    pub users: i64,
    pub courses: i64,
    pub lessons: i64,
    pub enrollments: i64,
    pub comments: i64,
    pub ratings: i64,
}

//=========================================================================================
// Report rows
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CourseStats {
    pub course_id: DbId,
    pub title: String,
    pub total_students: i64,
    pub total_lessons: i64,
    /// Rounded to one decimal; `None` when no lesson of the course has a rating.
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_id: DbId,
    pub full_name: String,
    pub total_courses_enrolled: i64,
    pub total_comments: i64,
    pub total_ratings: i64,
}

/// Activity of one user, with both sides counted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserActivity {
    pub user_id: DbId,
    pub comments: i64,
    pub ratings: i64,
}

impl UserActivity {
    pub fn total(&self) -> i64 {
        self.comments + self.ratings
    }
}

//=========================================================================================
// Functions
//=========================================================================================

/// Rounds to one decimal place, exact ties to even (`4.25` becomes `4.2`).
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Average shown by the dedicated lesson-average endpoint: `0.0` when unrated.
pub fn lesson_average_or_zero(summary: &LessonRatingSummary) -> f64 {
    summary.average.map(round_one_decimal).unwrap_or(0.0)
}

/// Average attached to a lesson detail: `None` when unrated.
pub fn lesson_average_or_none(summary: &LessonRatingSummary) -> Option<f64> {
    summary.average.map(round_one_decimal)
}

fn count_index(counts: &[GroupCount]) -> HashMap<DbId, i64> {
    counts.iter().map(|c| (c.id, c.count)).collect()
}

/// Joins the page of courses with the three independent per-course aggregates.
pub fn build_course_stats(
    courses: &[Course],
    enrollment_counts: &[GroupCount],
    lesson_counts: &[GroupCount],
    rating_averages: &[GroupAverage],
) -> Vec<CourseStats> {
    let students = count_index(enrollment_counts);
    let lessons = count_index(lesson_counts);
    let averages: HashMap<DbId, f64> = rating_averages.iter().map(|a| (a.id, a.average)).collect();

    courses
        .iter()
        .map(|course| CourseStats {
            course_id: course.id,
            title: course.title.clone(),
            total_students: students.get(&course.id).copied().unwrap_or(0),
            total_lessons: lessons.get(&course.id).copied().unwrap_or(0),
            average_rating: averages.get(&course.id).copied().map(round_one_decimal),
        })
        .collect()
}

/// Joins the page of users with their enrollment, comment and rating counts.
pub fn build_user_stats(
    users: &[User],
    enrollment_counts: &[GroupCount],
    comment_counts: &[GroupCount],
    rating_counts: &[GroupCount],
) -> Vec<UserStats> {
    let enrollments = count_index(enrollment_counts);
    let comments = count_index(comment_counts);
    let ratings = count_index(rating_counts);

    users
        .iter()
        .map(|user| UserStats {
            user_id: user.id,
            full_name: user.full_name.clone(),
            total_courses_enrolled: enrollments.get(&user.id).copied().unwrap_or(0),
            total_comments: comments.get(&user.id).copied().unwrap_or(0),
            total_ratings: ratings.get(&user.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Orders rated lessons by average (desc), then rating count (desc).
///
/// Lessons equal on both keys come back in ascending id order; callers must
/// not rely on that tie-break.
pub fn rank_popular_lessons(
    mut summaries: Vec<LessonRatingSummary>,
    limit: usize,
) -> Vec<LessonRatingSummary> {
    summaries.retain(|s| s.count > 0 && s.average.is_some());
    summaries.sort_by(|a, b| {
        let by_average = b
            .average
            .partial_cmp(&a.average)
            .unwrap_or(Ordering::Equal);
        by_average
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.lesson_id.cmp(&b.lesson_id))
    });
    summaries.truncate(limit);
    summaries
}

/// Ranks users by `comments + ratings`, descending, ties by ascending id.
///
/// Each side comes from its own grouped count and users missing from either
/// side score zero there, so a user with comments but no ratings is counted
/// exactly once per comment.
pub fn rank_active_users(
    user_ids: &[DbId],
    comment_counts: &[GroupCount],
    rating_counts: &[GroupCount],
    limit: usize,
) -> Vec<UserActivity> {
    let comments = count_index(comment_counts);
    let ratings = count_index(rating_counts);

    let mut activity: Vec<UserActivity> = user_ids
        .iter()
        .map(|&user_id| UserActivity {
            user_id,
            comments: comments.get(&user_id).copied().unwrap_or(0),
            ratings: ratings.get(&user_id).copied().unwrap_or(0),
        })
        .collect();

    activity.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    activity.truncate(limit);
    activity
}

/// Reorders `items` to follow `ranked_ids`, dropping anything not ranked.
pub fn order_by_rank<T>(ranked_ids: &[DbId], items: Vec<T>, id_of: impl Fn(&T) -> DbId) -> Vec<T> {
    let mut by_id: HashMap<DbId, T> = items.into_iter().map(|item| (id_of(&item), item)).collect();
    ranked_ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
