//! Shared helpers for the router-level integration tests.
//!
//! Every test builds the full application over a fresh in-memory store and
//! drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use api_lib::adapters::InMemoryStore;
use api_lib::auth::jwt::JwtConfig;
use api_lib::auth::password::hash_password;
use api_lib::config::Config;
use api_lib::web::{router, state::AppState};
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use course_platform_core::{CoursePlatformStore, NewUser, User};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cret-Passw0rd";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub config: Config,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// A configuration with a fixed signing secret and no bootstrap admin.
pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "memory://".to_string(),
        db_max_connections: 1,
        log_level: tracing::Level::INFO,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 30,
        },
        cors_origins: Vec::new(),
        admin_bootstrap: None,
    }
}

pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let config = test_config();
    let state = Arc::new(AppState::new(store.clone(), config.clone()));
    TestApp {
        router: router(state),
        store,
        config,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, json_request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request(Method::GET, uri, Some(token), None)).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn post_form(app: Router, uri: &str, form: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

/// Posts a raw body with the given content type, bypassing JSON encoding.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    token: &str,
    content_type: &str,
    body: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Scenario helpers
// ---------------------------------------------------------------------------

/// Registers through the API and returns the created user JSON.
pub async fn register(app: Router, full_name: &str, email: &str) -> Value {
    let response = post_json(
        app,
        "/api/auth/register",
        json!({ "full_name": full_name, "email": email, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Logs in through the OAuth2 form endpoint and returns the access token.
pub async fn login(app: Router, email: &str) -> String {
    let response = post_form(
        app,
        "/api/auth/token",
        &format!("username={email}&password={PASSWORD}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["token_type"], "bearer");
    json["access_token"].as_str().unwrap().to_string()
}

/// Registers and logs in, returning `(user_id, token)`.
pub async fn signup(test: &TestApp, email: &str) -> (i64, String) {
    let user = register(test.app(), "Test User", email).await;
    let token = login(test.app(), email).await;
    (user["id"].as_i64().unwrap(), token)
}

/// Inserts an administrator straight into the store and logs in.
pub async fn admin(test: &TestApp) -> (User, String) {
    let user = test
        .store
        .create_user(NewUser {
            full_name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            is_active: true,
            is_admin: true,
        })
        .await
        .unwrap();
    let token = login(test.app(), "admin@example.com").await;
    (user, token)
}

pub async fn create_course(test: &TestApp, token: &str, title: &str) -> i64 {
    let response = post_json_auth(
        test.app(),
        "/api/courses",
        token,
        json!({ "title": title, "description": format!("{title} from scratch") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn create_lesson(
    test: &TestApp,
    token: &str,
    course_id: i64,
    title: &str,
    order: i32,
) -> i64 {
    let response = post_json_auth(
        test.app(),
        "/api/lessons",
        token,
        json!({
            "course_id": course_id,
            "title": title,
            "video_url": "https://video.example.com/1",
            "content": "Lesson body",
            "order": order,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn enroll(test: &TestApp, token: &str, course_id: i64) -> Response {
    post_auth(test.app(), &format!("/api/courses/enroll/{course_id}"), token).await
}

pub async fn rate(test: &TestApp, token: &str, lesson_id: i64, stars: i32) -> Response {
    post_json_auth(
        test.app(),
        "/api/ratings",
        token,
        json!({ "lesson_id": lesson_id, "stars": stars }),
    )
    .await
}
