//! User handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{json_request, parse_body, TestApp};

#[tokio::test]
async fn test_register_then_get_user() {
    let app = TestApp::new();

    let req = json_request(
        Method::POST,
        "/v1/users",
        Some(json!({ "email": "Ada@Example.com", "name": "Ada" })),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = parse_body(resp).await;
    assert_eq!(created["email"], "ada@example.com");

    let id = created["id"].as_str().unwrap();
    let req = json_request(Method::GET, &format!("/v1/users/{}", id), None);
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["name"], "Ada");
}

#[tokio::test]
async fn test_registered_user_can_join_conversation() {
    let app = TestApp::new();
    let seeded = app.seed_users(1).await.unwrap();

    let req = json_request(
        Method::POST,
        "/v1/users",
        Some(json!({ "email": "grace@example.com" })),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    let registered = parse_body(resp).await["id"].clone();

    let req = json_request(
        Method::POST,
        "/v1/conversations",
        Some(json!({ "user_ids": [seeded[0], registered] })),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_email_returns_409() {
    let app = TestApp::new();
    let body = json!({ "email": "dup@example.com" });

    let resp = app
        .router()
        .oneshot(json_request(Method::POST, "/v1/users", Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .router()
        .oneshot(json_request(Method::POST, "/v1/users", Some(body)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_email_returns_400() {
    let app = TestApp::new();

    let req = json_request(
        Method::POST,
        "/v1/users",
        Some(json!({ "email": "not-an-email" })),
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_returns_404() {
    let app = TestApp::new();

    let req = json_request(Method::GET, &format!("/v1/users/{}", Uuid::new_v4()), None);
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
