use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, UserRepository};

use super::entity::{post, user};
use super::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn user_model(nickname: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        name: format!("{nickname}-name"),
        nickname: nickname.to_owned(),
        email: format!("{nickname}@example.com"),
        password_hash: "hash".to_owned(),
        avatar_filename: "default.jpg".to_owned(),
        is_admin: false,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            content: "hello".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let found = result.unwrap();
    assert_eq!(found.id, post_id);
    assert_eq!(found.author_id, author_id);
    assert_eq!(found.content, "hello");
}

#[tokio::test]
async fn test_find_user_by_nickname() {
    let model = user_model("alice");
    let expected_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result: Option<User> = repo.find_by_nickname("alice").await.unwrap();

    let found = result.unwrap();
    assert_eq!(found.id, expected_id);
    assert_eq!(found.nickname, "alice");
    assert!(found.has_default_avatar());
}

#[tokio::test]
async fn test_duplicate_insert_maps_to_constraint() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Custom(
            "duplicate key value violates unique constraint \"users_nickname_key\"".to_owned(),
        )])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = User::new(
        "alice".to_owned(),
        "alice-nick".to_owned(),
        "alice@example.com".to_owned(),
        "hash".to_owned(),
    );

    let result = repo.insert(user).await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
}
