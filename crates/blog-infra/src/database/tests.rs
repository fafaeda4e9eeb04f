use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, QuerySelect, QueryTrait, Value};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostStatus};
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};

use crate::database::entity::{comment, post, post_tag, tag};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};

fn post_model(title: &str, status: post::Status) -> post::Model {
    let publish = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
    post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: title.to_owned(),
        slug: title.to_lowercase(),
        body: "Body".to_owned(),
        publish: publish.into(),
        created: publish.into(),
        updated: publish.into(),
        status,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model("Test Post", post::Status::Draft);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_find_published_by_date_and_slug() {
    let model = post_model("Hello", post::Status::Published);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();

    let found = repo
        .find_published_by_date_and_slug(date, "hello")
        .await
        .unwrap()
        .expect("post should be found");
    assert_eq!(found.id, model.id);
    assert_eq!(found.absolute_path(), "/blog/2024/5/17/hello");

    let missing = repo
        .find_published_by_date_and_slug(date, "nope")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_last_representable_day_matches_nothing() {
    // No query results are queued: any round trip to the database would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);
    let date = chrono::NaiveDate::MAX;

    let found = repo.find_published_by_date_and_slug(date, "x").await.unwrap();
    assert!(found.is_none());
    assert!(!repo.slug_taken("x", date, None).await.unwrap());
}

#[test]
fn test_post_tag_joins_both_sides() {
    let to_posts = post_tag::Entity::find()
        .inner_join(post::Entity)
        .build(DatabaseBackend::Postgres)
        .to_string();
    assert!(to_posts.contains(r#"INNER JOIN "posts""#));

    let to_tags = post_tag::Entity::find()
        .inner_join(tag::Entity)
        .build(DatabaseBackend::Postgres)
        .to_string();
    assert!(to_tags.contains(r#"INNER JOIN "tags""#));

    let post_tags = post::Entity::find()
        .inner_join(tag::Entity)
        .build(DatabaseBackend::Postgres)
        .to_string();
    assert!(post_tags.contains(r#"INNER JOIN "post_tags""#));
}

#[tokio::test]
async fn test_count_published() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(7)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.count_published(Some(Uuid::new_v4())).await.unwrap(), 7);
}

#[tokio::test]
async fn test_published_sharing_tags_counts_links() {
    let tag_a = Uuid::new_v4();
    let tag_b = Uuid::new_v4();
    let current = Uuid::new_v4();
    let two_shared = post_model("Two", post::Status::Published);
    let one_shared = post_model("One", post::Status::Published);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            post_tag::Model {
                post_id: two_shared.id,
                tag_id: tag_a,
            },
            post_tag::Model {
                post_id: two_shared.id,
                tag_id: tag_b,
            },
            post_tag::Model {
                post_id: one_shared.id,
                tag_id: tag_b,
            },
        ]])
        .append_query_results([vec![two_shared.clone(), one_shared.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let candidates = repo
        .published_sharing_tags(&[tag_a, tag_b], current)
        .await
        .unwrap();

    assert_eq!(candidates.len(), 2);
    let count_of = |id: Uuid| {
        candidates
            .iter()
            .find(|c| c.post.id == id)
            .map(|c| c.same_tags)
    };
    assert_eq!(count_of(two_shared.id), Some(2));
    assert_eq!(count_of(one_shared.id), Some(1));
}

#[tokio::test]
async fn test_create_comment() {
    let post_id = Uuid::new_v4();
    let comment = Comment::new(
        post_id,
        "Ann".to_owned(),
        "ann@example.com".to_owned(),
        "Nice".to_owned(),
    );
    let now = comment.created;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: comment.id,
            post_id,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Nice".to_owned(),
            created: now.into(),
            updated: now.into(),
            active: true,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let saved = repo.create(comment.clone()).await.unwrap();
    assert_eq!(saved, comment);
    assert!(saved.active);
}

#[tokio::test]
async fn test_active_comments_for_post() {
    let post_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: Uuid::new_v4(),
            post_id,
            name: "Bob".to_owned(),
            email: "bob@example.com".to_owned(),
            body: "First".to_owned(),
            created: now.into(),
            updated: now.into(),
            active: true,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let comments = repo.active_for_post(post_id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].name, "Bob");
}

#[tokio::test]
async fn test_tags_for_post_without_links() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post_tag::Model>::new()])
        .into_connection();

    let repo = PostgresTagRepository::new(db);

    assert!(repo.tags_for_post(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_tag_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag::Model {
            id: Uuid::new_v4(),
            name: "Rust".to_owned(),
            slug: "rust".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);

    let tag = repo.find_by_slug("rust").await.unwrap().unwrap();
    assert_eq!(tag.name, "Rust");
}
