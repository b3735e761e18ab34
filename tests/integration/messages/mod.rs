//! Message handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{json_request, parse_body, TestApp};

async fn conversation_for(app: &TestApp, user_ids: &[Uuid]) -> String {
    let req = json_request(
        Method::POST,
        "/v1/conversations",
        Some(json!({ "user_ids": user_ids })),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    parse_body(resp).await["id"].as_str().unwrap().to_string()
}

async fn send(app: &TestApp, conversation_id: &str, sender: Uuid, content: &str) -> (StatusCode, Value) {
    let req = json_request(
        Method::POST,
        &format!("/v1/conversations/{}/messages", conversation_id),
        Some(json!({ "sender_id": sender, "content": content })),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

async fn list(app: &TestApp, conversation_id: &str) -> (StatusCode, Value) {
    let req = json_request(
        Method::GET,
        &format!("/v1/conversations/{}/messages", conversation_id),
        None,
    );
    let resp = app.router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

mod test_send_message {
    use super::*;

    #[tokio::test]
    async fn test_send_message_returns_201() {
        let app = TestApp::new();
        let users = app.seed_users(2).await.unwrap();
        let conv = conversation_for(&app, &users).await;

        let (status, body) = send(&app, &conv, users[0], "hi").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "hi");
        assert_eq!(body["sender_id"], json!(users[0]));
        assert_eq!(body["conversation_id"], conv);
    }

    #[tokio::test]
    async fn test_non_participant_returns_403() {
        let app = TestApp::new();
        let users = app.seed_users(3).await.unwrap();
        let conv = conversation_for(&app, &users[..2]).await;

        let (status, body) = send(&app, &conv, users[2], "let me in").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");

        let (_, messages) = list(&app, &conv).await;
        assert_eq!(messages, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_conversation_returns_404() {
        let app = TestApp::new();
        let users = app.seed_users(1).await.unwrap();

        let (status, _) = send(&app, &Uuid::new_v4().to_string(), users[0], "hello").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_content_returns_400() {
        let app = TestApp::new();
        let users = app.seed_users(2).await.unwrap();
        let conv = conversation_for(&app, &users).await;

        let (status, _) = send(&app, &conv, users[0], "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, &conv, users[0], "   \n").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_content_returns_400() {
        let app = TestApp::new();
        let users = app.seed_users(2).await.unwrap();
        let conv = conversation_for(&app, &users).await;

        let (status, _) = send(&app, &conv, users[0], &"a".repeat(10_001)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod test_list_messages {
    use super::*;

    #[tokio::test]
    async fn test_messages_listed_in_send_order() {
        let app = TestApp::new();
        let users = app.seed_users(2).await.unwrap();
        let conv = conversation_for(&app, &users).await;

        send(&app, &conv, users[0], "hi").await;
        send(&app, &conv, users[1], "yo").await;

        let (status, body) = list(&app, &conv).await;
        assert_eq!(status, StatusCode::OK);

        let contents: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["hi", "yo"]);
    }

    #[tokio::test]
    async fn test_reused_conversation_shares_history() {
        let app = TestApp::new();
        let users = app.seed_users(2).await.unwrap();
        let conv = conversation_for(&app, &users).await;
        send(&app, &conv, users[0], "first").await;

        let again = conversation_for(&app, &[users[1], users[0]]).await;
        assert_eq!(conv, again);

        let (_, body) = list(&app, &again).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["content"], "first");
    }

    #[tokio::test]
    async fn test_unknown_conversation_returns_404() {
        let app = TestApp::new();

        let (status, body) = list(&app, &Uuid::new_v4().to_string()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_conversation_id_returns_structured_400() {
        let app = TestApp::new();

        let (status, body) = list(&app, "12345").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");

        let users = app.seed_users(1).await.unwrap();
        let (status, body) = send(&app, "12345", users[0], "hi").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_new_conversation_has_no_messages() {
        let app = TestApp::new();
        let users = app.seed_users(2).await.unwrap();
        let conv = conversation_for(&app, &users).await;

        let (status, body) = list(&app, &conv).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
