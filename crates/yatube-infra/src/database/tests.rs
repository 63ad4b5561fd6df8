use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
use yatube_core::domain::{Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, UserRepository};
use yatube_core::validation::PostInput;

fn post_model(id: Uuid, author_id: Uuid, text: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        author_id,
        group_id: None,
        text: text.to_owned(),
        image: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id, "Hello there")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.text, "Hello there");
}

#[tokio::test]
async fn test_save_inserts_new_post() {
    let author_id = Uuid::new_v4();
    let post = Post::new(
        author_id,
        PostInput {
            text: "Fresh".to_string(),
            group_id: None,
            image: None,
        },
    );

    // Existence lookup comes back empty, then the INSERT ... RETURNING row.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![
            Vec::<post::Model>::new(),
            vec![post_model(post.id, author_id, "Fresh")],
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = repo.save(post.clone()).await.unwrap();
    assert_eq!(saved.id, post.id);
    assert_eq!(saved.text, "Fresh");
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_user_by_username() {
    let now = chrono::Utc::now();
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id,
            username: "leo".to_owned(),
            first_name: "Leo".to_owned(),
            last_name: "Tolstoy".to_owned(),
            password_hash: "hash".to_owned(),
            is_staff: false,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let found: Option<User> = repo.find_by_username("leo").await.unwrap();

    let found = found.unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.display_name(), "Leo Tolstoy");
}
