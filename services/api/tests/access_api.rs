//! Integration tests for enrollment-gated lesson access, comments and ratings.

mod common;

use axum::http::StatusCode;
use common::{
    admin, body_json, build_test_app, create_course, create_lesson, delete_auth, enroll, get,
    get_auth, post_json_auth, put_json_auth, rate, signup, TestApp,
};
use serde_json::json;

/// An author with one course and one lesson. Returns `(author_token, course_id, lesson_id)`.
async fn seeded_lesson(test: &TestApp) -> (String, i64, i64) {
    let (_, author) = signup(test, "author@example.com").await;
    let course_id = create_course(test, &author, "Rust").await;
    let lesson_id = create_lesson(test, &author, course_id, "Ownership", 1).await;
    (author, course_id, lesson_id)
}

async fn comment(test: &TestApp, token: &str, lesson_id: i64, text: &str) -> i64 {
    let response = post_json_auth(
        test.app(),
        "/api/comments",
        token,
        json!({ "lesson_id": lesson_id, "text": text }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn lesson_detail_requires_enrollment() {
    let test = build_test_app();
    let (_, course_id, lesson_id) = seeded_lesson(&test).await;
    let (_, student) = signup(&test, "student@example.com").await;
    let uri = format!("/api/lessons/{lesson_id}");

    let response = get_auth(test.app(), &uri, &student).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    enroll(&test, &student, course_id).await;
    comment(&test, &student, lesson_id, "Clear explanation").await;
    rate(&test, &student, lesson_id, 4).await;

    let response = get_auth(test.app(), &uri, &student).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["title"], "Ownership");
    assert_eq!(detail["comments"].as_array().unwrap().len(), 1);
    assert_eq!(detail["average_rating"], 4.0);
}

#[tokio::test]
async fn author_views_own_lesson_without_enrolling() {
    let test = build_test_app();
    let (author, _, lesson_id) = seeded_lesson(&test).await;

    let response = get_auth(test.app(), &format!("/api/lessons/{lesson_id}"), &author).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert!(detail["average_rating"].is_null());
    assert!(detail["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_lesson_is_not_found_before_any_rule_runs() {
    let test = build_test_app();
    let (_, student) = signup(&test, "student@example.com").await;

    let response = get_auth(test.app(), "/api/lessons/999", &student).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = rate(&test, &student, 999, 3).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(test.app(), "/api/ratings/lesson/999/average").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rating_requires_enrollment_even_for_author_and_admin() {
    let test = build_test_app();
    let (author, _, lesson_id) = seeded_lesson(&test).await;
    let (_, admin_token) = admin(&test).await;

    let response = rate(&test, &author, lesson_id, 5).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = rate(&test, &admin_token, lesson_id, 5).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(test.app(), &format!("/api/ratings/lesson/{lesson_id}/average")).await;
    assert_eq!(body_json(response).await, json!(0.0));
}

#[tokio::test]
async fn averages_round_exact_ties_to_even() {
    let test = build_test_app();
    let (author, course_id, lesson_id) = seeded_lesson(&test).await;
    for (i, stars) in [4, 4, 4, 5].into_iter().enumerate() {
        let (_, student) = signup(&test, &format!("student{i}@example.com")).await;
        enroll(&test, &student, course_id).await;
        let response = rate(&test, &student, lesson_id, stars).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(test.app(), &format!("/api/ratings/lesson/{lesson_id}/average")).await;
    assert_eq!(body_json(response).await, json!(4.2));

    let response = get_auth(test.app(), &format!("/api/lessons/{lesson_id}"), &author).await;
    assert_eq!(body_json(response).await["average_rating"], 4.2);
}

#[tokio::test]
async fn rating_twice_updates_the_existing_row() {
    let test = build_test_app();
    let (_, course_id, lesson_id) = seeded_lesson(&test).await;
    let (student_id, student) = signup(&test, "student@example.com").await;
    enroll(&test, &student, course_id).await;

    let response = rate(&test, &student, lesson_id, 2).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;

    let response = rate(&test, &student, lesson_id, 5).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["user_id"], student_id);
    assert_eq!(second["stars"], 5);

    let response = get_auth(
        test.app(),
        &format!("/api/ratings/lesson/{lesson_id}"),
        &student,
    )
    .await;
    let ratings = body_json(response).await;
    assert_eq!(ratings.as_array().unwrap().len(), 1);

    let response = get(test.app(), &format!("/api/ratings/lesson/{lesson_id}/average")).await;
    assert_eq!(body_json(response).await, json!(5.0));
}

#[tokio::test]
async fn stars_outside_one_to_five_are_rejected() {
    let test = build_test_app();
    let (_, course_id, lesson_id) = seeded_lesson(&test).await;
    let (_, student) = signup(&test, "student@example.com").await;
    enroll(&test, &student, course_id).await;

    for stars in [0, 6] {
        let response = rate(&test, &student, lesson_id, stars).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    rate(&test, &student, lesson_id, 3).await;
    let response = rate(&test, &student, lesson_id, 6).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = get_auth(test.app(), "/api/ratings/my", &student).await;
    let mine = body_json(response).await;
    assert_eq!(mine[0]["stars"], 3);
}

#[tokio::test]
async fn ratings_are_deleted_only_by_their_owner() {
    let test = build_test_app();
    let (author, course_id, lesson_id) = seeded_lesson(&test).await;
    let (_, student) = signup(&test, "student@example.com").await;
    enroll(&test, &student, course_id).await;
    let rating = body_json(rate(&test, &student, lesson_id, 4).await).await;
    let uri = format!("/api/ratings/{}", rating["id"]);

    let response = delete_auth(test.app(), &uri, &author).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(test.app(), &uri, &student).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn comments_list_newest_first_for_enrolled_users() {
    let test = build_test_app();
    let (_, course_id, lesson_id) = seeded_lesson(&test).await;
    let (_, student) = signup(&test, "student@example.com").await;
    let (_, outsider) = signup(&test, "outsider@example.com").await;
    enroll(&test, &student, course_id).await;

    let response = post_json_auth(
        test.app(),
        "/api/comments",
        &outsider,
        json!({ "lesson_id": lesson_id, "text": "Let me in" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    comment(&test, &student, lesson_id, "first").await;
    comment(&test, &student, lesson_id, "second").await;

    let uri = format!("/api/comments/lesson/{lesson_id}");
    let response = get_auth(test.app(), &uri, &outsider).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(test.app(), &uri, &student).await;
    let comments = body_json(response).await;
    assert_eq!(comments[0]["text"], "second");
    assert_eq!(comments[1]["text"], "first");
}

#[tokio::test]
async fn comment_edits_belong_to_the_owner_or_an_admin() {
    let test = build_test_app();
    let (author, course_id, lesson_id) = seeded_lesson(&test).await;
    let (_, student) = signup(&test, "student@example.com").await;
    let (_, admin_token) = admin(&test).await;
    enroll(&test, &student, course_id).await;
    let comment_id = comment(&test, &student, lesson_id, "Typo in slide 3").await;
    let uri = format!("/api/comments/{comment_id}");

    let response = put_json_auth(test.app(), &uri, &author, json!({ "text": "Rewritten" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(test.app(), &uri, &student, json!({ "text": "" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response =
        put_json_auth(test.app(), &uri, &admin_token, json!({ "text": "Moderated" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["text"], "Moderated");
}

#[tokio::test]
async fn course_author_may_delete_any_comment_on_their_course() {
    let test = build_test_app();
    let (author, course_id, lesson_id) = seeded_lesson(&test).await;
    let (_, student) = signup(&test, "student@example.com").await;
    let (_, classmate) = signup(&test, "classmate@example.com").await;
    enroll(&test, &student, course_id).await;
    enroll(&test, &classmate, course_id).await;
    let comment_id = comment(&test, &student, lesson_id, "Off topic").await;
    let uri = format!("/api/comments/{comment_id}");

    let response = get_auth(test.app(), &uri, &classmate).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(test.app(), &uri, &classmate).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(test.app(), &uri, &author).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(test.app(), &uri, &student).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
