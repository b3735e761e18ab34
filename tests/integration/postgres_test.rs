//! PostgreSQL-backed integration tests
//!
//! Skipped unless TEST_DATABASE_URL points at a disposable database.

use std::collections::HashSet;
use std::sync::Arc;

use parlor_common::Error;
use parlor_conversations::{ConversationService, ConversationsRepositories, ParticipantSet};
use parlor_users::{PgUserRepository, User, UserDirectory};
use sqlx::PgPool;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    dotenvy::from_filename(".env.test").ok();
    let url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

async fn seed(users: &PgUserRepository, count: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let user = User::new(format!("pg-{}@example.com", Uuid::new_v4()), None).unwrap();
        ids.push(users.create(&user).await.unwrap().id);
    }
    ids
}

fn service(pool: &PgPool) -> (ConversationService, Arc<PgUserRepository>) {
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let service = ConversationService::new(ConversationsRepositories::postgres(pool.clone()), users.clone());
    (service, users)
}

#[test_log::test(tokio::test)]
async fn test_find_or_create_and_messaging_round_trip() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (service, users) = service(&pool);
    let ids = seed(&users, 2).await;

    let first = assert_ok!(service.create_or_get_conversation(ids.clone()).await);
    assert!(first.created);

    let second = assert_ok!(
        service
            .create_or_get_conversation(vec![ids[1], ids[0]])
            .await
    );
    assert!(!second.created);
    assert_eq!(first.conversation.id(), second.conversation.id());

    let conv = first.conversation.id();
    assert_ok!(service.send_message(conv, ids[0], "hi".to_string()).await);
    assert_ok!(service.send_message(conv, ids[1], "yo".to_string()).await);

    let contents: Vec<String> = service
        .list_messages(conv)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["hi", "yo"]);
}

#[test_log::test(tokio::test)]
async fn test_concurrent_creates_share_one_row() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (service, users) = service(&pool);
    let ids = seed(&users, 3).await;

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let service = service.clone();
            let mut ids = ids.clone();
            ids.rotate_left(i % 3);
            tokio::spawn(async move { service.create_or_get_conversation(ids).await })
        })
        .collect();

    let mut conversation_ids = HashSet::new();
    let mut created = 0;
    for handle in handles {
        let outcome = assert_ok!(handle.await.unwrap());
        if outcome.created {
            created += 1;
        }
        conversation_ids.insert(outcome.conversation.id());
    }

    assert_eq!(created, 1);
    assert_eq!(conversation_ids.len(), 1);

    let key = ParticipantSet::new(ids).unwrap().canonical_key();
    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE participant_key = $1")
            .bind(&key)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 1);
}

#[test_log::test(tokio::test)]
async fn test_missing_users_reported() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (service, users) = service(&pool);
    let ids = seed(&users, 1).await;
    let ghost = Uuid::new_v4();

    let err = assert_err!(
        service
            .create_or_get_conversation(vec![ids[0], ghost])
            .await
    );

    assert!(matches!(err, Error::UsersNotFound(missing) if missing == vec![ghost]));
}

#[test_log::test(tokio::test)]
async fn test_non_participant_cannot_send() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (service, users) = service(&pool);
    let ids = seed(&users, 3).await;

    let conv = service
        .create_or_get_conversation(ids[..2].to_vec())
        .await
        .unwrap()
        .conversation
        .id();

    let err = assert_err!(service.send_message(conv, ids[2], "hello".to_string()).await);
    assert!(matches!(err, Error::Forbidden(_)));
}
