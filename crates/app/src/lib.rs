//! Parlor application composition root
//!
//! Builds storage from configuration and composes all domain routers into a
//! single application.

use std::sync::Arc;

use axum::Router;
use parlor_common::{Config, StorageBackend};
use parlor_conversations::{ConversationService, ConversationsRepositories, ConversationsState, InMemoryConversationStore};
use parlor_users::{InMemoryUserRepository, PgUserRepository, UserDirectory, UsersState};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

/// Maximum accepted request body size in bytes
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Storage handles shared by all domains
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserDirectory>,
    pub conversations: ConversationsRepositories,
}

impl Storage {
    /// Storage backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            conversations: ConversationsRepositories::postgres(pool),
        }
    }

    /// Process-local storage
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            conversations: ConversationsRepositories::in_memory(InMemoryConversationStore::new()),
        }
    }
}

/// Build storage for the configured backend, connecting and migrating when needed
pub async fn connect_storage(config: &Config) -> Result<Storage, anyhow::Error> {
    match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Storage::in_memory())
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;

            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

            info!("Database connection established");

            if config.run_migrations {
                sqlx::migrate!("../../migrations").run(&pool).await?;
                info!("Database migrations applied");
            }

            Ok(Storage::postgres(pool))
        }
    }
}

/// Create the main application router with all routes
pub fn create_app(storage: Storage) -> Router {
    let users_state = UsersState {
        users: storage.users.clone(),
    };

    let conversations_state = ConversationsState {
        service: ConversationService::new(storage.conversations, storage.users),
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Parlor API v0.0.1-SNAPSHOT" }),
        )
        .merge(parlor_users::routes().with_state(users_state))
        .merge(parlor_conversations::routes().with_state(conversations_state))
}

/// Request body size limit applied to every route
pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
