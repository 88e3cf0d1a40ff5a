//! Integration tests for the administrator reporting endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    admin, body_json, build_test_app, create_course, create_lesson, enroll, get_auth, post_auth,
    post_json_auth, rate, signup,
};
use serde_json::json;

#[tokio::test]
async fn reports_are_admin_only() {
    let test = build_test_app();
    let (_, student) = signup(&test, "student@example.com").await;

    for uri in [
        "/api/admin/stats/courses",
        "/api/admin/stats/users",
        "/api/admin/stats/popular-lessons",
        "/api/admin/stats/active-users",
        "/api/admin/stats/overview",
        "/api/admin/enrollments",
    ] {
        let response = get_auth(test.app(), uri, &student).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = post_auth(test.app(), "/api/admin/auth-check", &student).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn course_stats_count_students_lessons_and_average() {
    let test = build_test_app();
    let (_, author) = signup(&test, "author@example.com").await;
    let (_, student) = signup(&test, "student@example.com").await;
    let (_, admin_token) = admin(&test).await;
    let rated = create_course(&test, &author, "Rust").await;
    create_course(&test, &author, "Go").await;
    let lesson_id = create_lesson(&test, &author, rated, "Ownership", 1).await;
    enroll(&test, &student, rated).await;
    rate(&test, &student, lesson_id, 4).await;

    let response = get_auth(test.app(), "/api/admin/stats/courses", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats[0]["course_id"], rated);
    assert_eq!(stats[0]["total_students"], 1);
    assert_eq!(stats[0]["total_lessons"], 1);
    assert_eq!(stats[0]["average_rating"], 4.0);
    assert_eq!(stats[1]["title"], "Go");
    assert_eq!(stats[1]["total_students"], 0);
    assert!(stats[1]["average_rating"].is_null());
}

#[tokio::test]
async fn user_stats_count_each_kind_of_activity() {
    let test = build_test_app();
    let (author_id, author) = signup(&test, "author@example.com").await;
    let (student_id, student) = signup(&test, "student@example.com").await;
    let (_, admin_token) = admin(&test).await;
    let course_id = create_course(&test, &author, "Rust").await;
    let lesson_id = create_lesson(&test, &author, course_id, "Ownership", 1).await;
    enroll(&test, &student, course_id).await;
    rate(&test, &student, lesson_id, 5).await;
    for text in ["one", "two"] {
        post_json_auth(
            test.app(),
            "/api/comments",
            &student,
            json!({ "lesson_id": lesson_id, "text": text }),
        )
        .await;
    }

    let response = get_auth(test.app(), "/api/admin/stats/users", &admin_token).await;
    let stats = body_json(response).await;
    assert_eq!(stats.as_array().unwrap().len(), 3);
    assert_eq!(stats[0]["user_id"], author_id);
    assert_eq!(stats[0]["total_comments"], 0);
    assert_eq!(stats[1]["user_id"], student_id);
    assert_eq!(stats[1]["total_courses_enrolled"], 1);
    assert_eq!(stats[1]["total_comments"], 2);
    assert_eq!(stats[1]["total_ratings"], 1);
}

#[tokio::test]
async fn popular_lessons_rank_by_average_then_count() {
    let test = build_test_app();
    let (_, author) = signup(&test, "author@example.com").await;
    let (_, first) = signup(&test, "first@example.com").await;
    let (_, second) = signup(&test, "second@example.com").await;
    let (_, admin_token) = admin(&test).await;
    let course_id = create_course(&test, &author, "Rust").await;
    let solo = create_lesson(&test, &author, course_id, "Solo five", 1).await;
    let pair = create_lesson(&test, &author, course_id, "Pair five", 2).await;
    let low = create_lesson(&test, &author, course_id, "Low", 3).await;
    create_lesson(&test, &author, course_id, "Unrated", 4).await;
    enroll(&test, &first, course_id).await;
    enroll(&test, &second, course_id).await;
    rate(&test, &first, solo, 5).await;
    rate(&test, &first, pair, 5).await;
    rate(&test, &second, pair, 5).await;
    rate(&test, &second, low, 2).await;

    let response = get_auth(test.app(), "/api/admin/stats/popular-lessons", &admin_token).await;
    let ranked = body_json(response).await;
    let ids: Vec<i64> = ranked
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![pair, solo, low]);

    let response = get_auth(
        test.app(),
        "/api/admin/stats/popular-lessons?limit=1",
        &admin_token,
    )
    .await;
    let top = body_json(response).await;
    assert_eq!(top.as_array().unwrap().len(), 1);
    assert_eq!(top[0]["id"], pair);
}

#[tokio::test]
async fn active_users_include_everyone_ordered_by_activity() {
    let test = build_test_app();
    let (author_id, author) = signup(&test, "author@example.com").await;
    let (student_id, student) = signup(&test, "student@example.com").await;
    let (admin_user, admin_token) = admin(&test).await;
    let course_id = create_course(&test, &author, "Rust").await;
    let lesson_id = create_lesson(&test, &author, course_id, "Ownership", 1).await;
    enroll(&test, &student, course_id).await;
    rate(&test, &student, lesson_id, 3).await;
    for text in ["a", "b", "c"] {
        post_json_auth(
            test.app(),
            "/api/comments",
            &student,
            json!({ "lesson_id": lesson_id, "text": text }),
        )
        .await;
    }
    post_json_auth(
        test.app(),
        "/api/comments",
        &author,
        json!({ "lesson_id": lesson_id, "text": "Thanks" }),
    )
    .await;

    let response = get_auth(test.app(), "/api/admin/stats/active-users", &admin_token).await;
    let users = body_json(response).await;
    let ids: Vec<i64> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![student_id, author_id, admin_user.id]);
}

#[tokio::test]
async fn overview_and_enrollment_listing() {
    let test = build_test_app();
    let (_, author) = signup(&test, "author@example.com").await;
    let (student_id, student) = signup(&test, "student@example.com").await;
    let (_, admin_token) = admin(&test).await;
    let course_id = create_course(&test, &author, "Rust").await;
    let lesson_id = create_lesson(&test, &author, course_id, "Ownership", 1).await;
    enroll(&test, &student, course_id).await;
    rate(&test, &student, lesson_id, 4).await;

    let response = get_auth(test.app(), "/api/admin/stats/overview", &admin_token).await;
    let overview = body_json(response).await;
    assert_eq!(
        overview,
        json!({
            "total_users": 3,
            "total_courses": 1,
            "total_lessons": 1,
            "total_enrollments": 1,
            "total_comments": 0,
            "total_ratings": 1,
        })
    );

    let response = get_auth(test.app(), "/api/admin/enrollments", &admin_token).await;
    let enrollments = body_json(response).await;
    assert_eq!(enrollments.as_array().unwrap().len(), 1);
    assert_eq!(enrollments[0]["user_id"], student_id);
    assert_eq!(enrollments[0]["course_id"], course_id);
}

#[tokio::test]
async fn auth_check_returns_the_admin_identity() {
    let test = build_test_app();
    let (admin_user, admin_token) = admin(&test).await;

    let response = post_auth(test.app(), "/api/admin/auth-check", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let identity = body_json(response).await;
    assert_eq!(identity["email"], admin_user.email);
    assert_eq!(identity["is_admin"], true);
}
