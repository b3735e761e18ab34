//! Common test utilities and fixtures for integration tests
//!
//! Builds the full application over in-memory storage and exposes the
//! stores so tests can seed users and inspect persisted state.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use parlor_app::{create_app, Storage};
use parlor_conversations::{ConversationsRepositories, InMemoryConversationStore};
use parlor_users::InMemoryUserRepository;
use serde_json::Value;
use uuid::Uuid;

/// Test application over in-memory storage
pub struct TestApp {
    pub users: InMemoryUserRepository,
    pub store: InMemoryConversationStore,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let users = InMemoryUserRepository::new();
        let store = InMemoryConversationStore::new();

        let storage = Storage {
            users: Arc::new(users.clone()),
            conversations: ConversationsRepositories::in_memory(store.clone()),
        };

        Self {
            users,
            store,
            router: create_app(storage),
        }
    }

    /// Router clone for a single oneshot request
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Register `count` users and return their ids
    pub async fn seed_users(&self, count: usize) -> Result<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let email = format!("user-{}@example.com", Uuid::new_v4());
            ids.push(self.users.seed(&email).await?);
        }
        Ok(ids)
    }
}

/// Build a request with an optional JSON body
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Parse response body as JSON Value
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
