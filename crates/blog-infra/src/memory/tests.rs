use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use blog_core::domain::{Post, PostDate, User};
use blog_core::error::RepoError;
use blog_core::forms::{CommentForm, NewPost, PostEdit, SharePostForm};
use blog_core::ports::{BaseRepository, PostRepository, UserRepository};
use blog_core::services::BlogSettings;
use blog_core::{BlogService, DomainError};

use super::InMemoryStore;
use crate::mail::InMemoryMailer;

struct Fixture {
    store: InMemoryStore,
    mailer: InMemoryMailer,
    service: BlogService,
    author: User,
}

impl Fixture {
    async fn new() -> Self {
        Self::with_mailer(InMemoryMailer::new()).await
    }

    async fn with_mailer(mailer: InMemoryMailer) -> Self {
        let store = InMemoryStore::new();
        let service = BlogService::new(
            Arc::new(store.posts()),
            Arc::new(store.comments()),
            Arc::new(store.tags()),
            Arc::new(store.users()),
            Arc::new(mailer.clone()),
            BlogSettings::default(),
        );
        let author = store
            .users()
            .create(User::new("admin".to_string(), "admin@myblog.com".to_string()))
            .await
            .unwrap();

        Self {
            store,
            mailer,
            service,
            author,
        }
    }

    async fn draft(&self, title: &str, publish: DateTime<Utc>, tags: &[&str]) -> Post {
        self.service
            .create_post(NewPost {
                author_id: self.author.id,
                title: title.to_string(),
                body: format!("{title} body"),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                publish: Some(publish),
                ..NewPost::default()
            })
            .await
            .unwrap()
    }

    async fn published(&self, title: &str, publish: DateTime<Utc>, tags: &[&str]) -> Post {
        let post = self.draft(title, publish, tags).await;
        self.service.publish_post(post.id).await.unwrap()
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()
}

fn date_of(post: &Post) -> PostDate {
    let date = post.publish_date();
    PostDate::new(
        chrono::Datelike::year(&date),
        chrono::Datelike::month(&date),
        chrono::Datelike::day(&date),
    )
}

fn comment(name: &str, email: &str, body: &str) -> CommentForm {
    CommentForm {
        name: name.to_string(),
        email: email.to_string(),
        body: body.to_string(),
    }
}

#[tokio::test]
async fn test_drafts_are_never_listed() {
    let fx = Fixture::new().await;
    let published = fx.published("Visible", day(1), &[]).await;
    fx.draft("Hidden", day(2), &[]).await;

    let listing = fx.service.post_list(None, None).await.unwrap();

    assert_eq!(listing.page.total, 1);
    assert_eq!(listing.posts.len(), 1);
    assert_eq!(listing.posts[0].post.id, published.id);
    assert_eq!(listing.posts[0].author.as_deref(), Some("admin"));
    assert_eq!(fx.service.all_posts().await.unwrap().len(), 2);
    assert_eq!(fx.service.published_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_listing_is_newest_first_in_pages_of_three() {
    let fx = Fixture::new().await;
    for d in 1..=7 {
        fx.published(&format!("Post {d}"), day(d), &[]).await;
    }

    let first = fx.service.post_list(None, None).await.unwrap();
    let titles: Vec<&str> = first.posts.iter().map(|c| c.post.title.as_str()).collect();
    assert_eq!(titles, ["Post 7", "Post 6", "Post 5"]);
    assert_eq!(first.page.num_pages, 3);
    assert!(first.page.has_next());
    assert!(!first.page.has_previous());

    let last = fx.service.post_list(None, Some("3")).await.unwrap();
    assert_eq!(last.posts.len(), 1);
    assert_eq!(last.posts[0].post.title, "Post 1");
}

#[tokio::test]
async fn test_pages_are_stable_when_publish_times_tie() {
    let fx = Fixture::new().await;
    let mut ids = Vec::new();
    for n in 1..=7 {
        ids.push(fx.published(&format!("Same time {n}"), day(1), &[]).await.id);
    }

    let mut seen = Vec::new();
    for page in ["1", "2", "3"] {
        let listing = fx.service.post_list(None, Some(page)).await.unwrap();
        seen.extend(listing.posts.iter().map(|c| c.post.id));
    }

    ids.sort_by(|a, b| b.cmp(a));
    assert_eq!(seen, ids);
}

#[tokio::test]
async fn test_invalid_page_numbers_never_fail() {
    let fx = Fixture::new().await;
    for d in 1..=4 {
        fx.published(&format!("Post {d}"), day(d), &[]).await;
    }

    let first = fx.service.post_list(None, None).await.unwrap();
    let garbage = fx.service.post_list(None, Some("abc")).await.unwrap();
    assert_eq!(garbage.page.number, 1);
    assert_eq!(
        garbage.posts.iter().map(|c| c.post.id).collect::<Vec<_>>(),
        first.posts.iter().map(|c| c.post.id).collect::<Vec<_>>()
    );

    let beyond = fx.service.post_list(None, Some("9999")).await.unwrap();
    assert_eq!(beyond.page.number, 2);
    assert_eq!(beyond.posts.len(), 1);
    assert_eq!(beyond.posts[0].post.title, "Post 1");
}

#[tokio::test]
async fn test_empty_blog_has_one_empty_page() {
    let fx = Fixture::new().await;

    let listing = fx.service.post_list(None, Some("5")).await.unwrap();

    assert!(listing.posts.is_empty());
    assert_eq!(listing.page.number, 1);
    assert_eq!(listing.page.num_pages, 1);
}

#[tokio::test]
async fn test_tag_filter() {
    let fx = Fixture::new().await;
    fx.published("Rusty", day(1), &["Rust"]).await;
    fx.published("Plain", day(2), &["Misc"]).await;
    fx.draft("Rusty draft", day(3), &["Rust"]).await;

    let listing = fx.service.post_list(Some("rust"), None).await.unwrap();

    assert_eq!(listing.tag.map(|t| t.name), Some("Rust".to_string()));
    assert_eq!(listing.posts.len(), 1);
    assert_eq!(listing.posts[0].post.title, "Rusty");
    assert_eq!(listing.posts[0].tags[0].slug, "rust");
}

#[tokio::test]
async fn test_unknown_tag_is_not_found() {
    let fx = Fixture::new().await;

    let result = fx.service.post_list(Some("nope"), None).await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            entity_type: "tag",
            ..
        })
    ));
}

#[tokio::test]
async fn test_detail_requires_published_post_on_that_date() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello World", day(17), &[]).await;
    let draft = fx.draft("Secret", day(17), &[]).await;

    let detail = fx
        .service
        .post_detail(date_of(&post), "hello-world")
        .await
        .unwrap();
    assert_eq!(detail.post.post.id, post.id);
    assert_eq!(post.absolute_path(), "/blog/2024/5/17/hello-world");

    let wrong_day = fx
        .service
        .post_detail(PostDate::new(2024, 5, 18), "hello-world")
        .await;
    assert!(matches!(wrong_day, Err(DomainError::NotFound { .. })));

    let invalid_date = fx
        .service
        .post_detail(PostDate::new(2024, 2, 30), "hello-world")
        .await;
    assert!(matches!(invalid_date, Err(DomainError::NotFound { .. })));

    let last_day = fx
        .service
        .post_detail(PostDate::new(262142, 12, 31), "hello-world")
        .await;
    assert!(matches!(last_day, Err(DomainError::NotFound { .. })));

    let hidden = fx.service.post_detail(date_of(&draft), "secret").await;
    assert!(matches!(hidden, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_valid_comment_is_stored_and_shown() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello", day(1), &[]).await;

    let detail = fx
        .service
        .add_comment(
            date_of(&post),
            "hello",
            comment("Ann", "ann@example.com", "Nice post"),
        )
        .await
        .unwrap();

    let created = detail.new_comment.expect("comment should be created");
    assert!(created.active);
    assert_eq!(created.post_id, post.id);
    assert!(detail.comment_errors.is_empty());
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].id, created.id);
}

#[tokio::test]
async fn test_invalid_comment_persists_nothing() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello", day(1), &[]).await;

    let detail = fx
        .service
        .add_comment(date_of(&post), "hello", comment("Ann", "", "Nice post"))
        .await
        .unwrap();

    assert!(detail.new_comment.is_none());
    assert!(detail.comment_errors.contains("email"));

    let detail = fx
        .service
        .post_detail(date_of(&post), "hello")
        .await
        .unwrap();
    assert!(detail.comments.is_empty());
}

#[tokio::test]
async fn test_inactive_comments_are_hidden() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello", day(1), &[]).await;
    let date = date_of(&post);

    let first = fx
        .service
        .add_comment(date, "hello", comment("Ann", "ann@example.com", "First"))
        .await
        .unwrap()
        .new_comment
        .unwrap();
    fx.service
        .add_comment(date, "hello", comment("Bob", "bob@example.com", "Second"))
        .await
        .unwrap();

    fx.store.set_comment_active(first.id, false).await.unwrap();

    let detail = fx.service.post_detail(date, "hello").await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].name, "Bob");
}

#[tokio::test]
async fn test_similar_posts_ranking() {
    let fx = Fixture::new().await;
    let current = fx.published("Current", day(10), &["A", "B"]).await;
    let one_old = fx.published("One old", day(1), &["B", "C"]).await;
    let one_new = fx.published("One new", day(2), &["A"]).await;
    let two = fx.published("Two", day(3), &["A", "B"]).await;
    fx.published("Unrelated", day(4), &["C"]).await;
    fx.draft("Draft twin", day(5), &["A", "B"]).await;

    let detail = fx
        .service
        .post_detail(date_of(&current), "current")
        .await
        .unwrap();

    let ranked: Vec<(Uuid, u32)> = detail
        .similar_posts
        .iter()
        .map(|s| (s.post.id, s.same_tags))
        .collect();
    assert_eq!(ranked, [(two.id, 2), (one_new.id, 1), (one_old.id, 1)]);
}

#[tokio::test]
async fn test_similar_posts_are_capped() {
    let fx = Fixture::new().await;
    let current = fx.published("Current", day(20), &["A"]).await;
    for d in 1..=6 {
        fx.published(&format!("Other {d}"), day(d), &["A"]).await;
    }

    let detail = fx
        .service
        .post_detail(date_of(&current), "current")
        .await
        .unwrap();

    assert_eq!(detail.similar_posts.len(), 4);
    assert!(detail.similar_posts.iter().all(|s| s.post.id != current.id));
    assert_eq!(detail.similar_posts[0].post.title, "Other 6");
}

#[tokio::test]
async fn test_untagged_post_has_no_similar_posts() {
    let fx = Fixture::new().await;
    let post = fx.published("Lonely", day(1), &[]).await;
    fx.published("Other", day(2), &["A"]).await;

    let detail = fx
        .service
        .post_detail(date_of(&post), "lonely")
        .await
        .unwrap();

    assert!(detail.similar_posts.is_empty());
}

#[tokio::test]
async fn test_share_sends_exactly_one_message() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello", day(17), &[]).await;

    let page = fx
        .service
        .share_post(
            post.id,
            SharePostForm {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                to: "bob@example.com".to_string(),
                comments: "Worth it".to_string(),
            },
            "http://localhost:8080/",
        )
        .await
        .unwrap();

    assert!(page.sent);
    let sent = fx.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["bob@example.com".to_string()]);
    assert_eq!(sent[0].from, "admin@myblog.com");
    assert_eq!(
        sent[0].subject,
        "Ann (ann@example.com) recommends you reading \"Hello\""
    );
    assert_eq!(
        sent[0].body,
        "Read \"Hello\" at http://localhost:8080/blog/2024/5/17/hello\n\nAnn's comments: Worth it"
    );
}

#[tokio::test]
async fn test_share_invalid_form_sends_nothing() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello", day(1), &[]).await;

    let page = fx
        .service
        .share_post(
            post.id,
            SharePostForm {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                to: "not-an-email".to_string(),
                comments: String::new(),
            },
            "http://localhost",
        )
        .await
        .unwrap();

    assert!(!page.sent);
    assert!(page.errors.contains("to"));
    assert!(fx.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_share_draft_is_not_found() {
    let fx = Fixture::new().await;
    let draft = fx.draft("Secret", day(1), &[]).await;

    let form = fx.service.share_form(draft.id).await;
    assert!(matches!(form, Err(DomainError::NotFound { .. })));

    let result = fx
        .service
        .share_post(
            draft.id,
            SharePostForm {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                to: "bob@example.com".to_string(),
                comments: String::new(),
            },
            "http://localhost",
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert!(fx.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_share_transport_failure_is_error() {
    let fx = Fixture::with_mailer(InMemoryMailer::failing()).await;
    let post = fx.published("Hello", day(1), &[]).await;

    let result = fx
        .service
        .share_post(
            post.id,
            SharePostForm {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                to: "bob@example.com".to_string(),
                comments: String::new(),
            },
            "http://localhost",
        )
        .await;

    assert!(matches!(result, Err(DomainError::Mail(_))));
}

#[tokio::test]
async fn test_duplicate_slug_on_same_day() {
    let fx = Fixture::new().await;
    fx.draft("Hello", day(1), &[]).await;

    let same_day = fx
        .service
        .create_post(NewPost {
            author_id: fx.author.id,
            title: "Hello".to_string(),
            body: "Again".to_string(),
            publish: Some(day(1) + Duration::hours(3)),
            ..NewPost::default()
        })
        .await;
    assert!(matches!(same_day, Err(DomainError::Duplicate(_))));

    let next_day = fx
        .service
        .create_post(NewPost {
            author_id: fx.author.id,
            title: "Hello".to_string(),
            body: "Again".to_string(),
            publish: Some(day(2)),
            ..NewPost::default()
        })
        .await;
    assert!(next_day.is_ok());
}

#[tokio::test]
async fn test_create_post_requires_known_author() {
    let fx = Fixture::new().await;

    let result = fx
        .service
        .create_post(NewPost {
            author_id: Uuid::new_v4(),
            title: "Orphan".to_string(),
            body: "Body".to_string(),
            ..NewPost::default()
        })
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            entity_type: "user",
            ..
        })
    ));
}

#[tokio::test]
async fn test_create_post_validation() {
    let fx = Fixture::new().await;

    let result = fx
        .service
        .create_post(NewPost {
            author_id: fx.author.id,
            title: "   ".to_string(),
            body: String::new(),
            ..NewPost::default()
        })
        .await;

    match result {
        Err(DomainError::Validation(errors)) => {
            assert!(errors.contains("title"));
            assert!(errors.contains("body"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_publish_is_idempotent() {
    let fx = Fixture::new().await;
    let draft = fx.draft("Hello", day(1), &[]).await;
    assert!(!draft.is_published());

    let first = fx.service.publish_post(draft.id).await.unwrap();
    let second = fx.service.publish_post(draft.id).await.unwrap();

    assert!(first.is_published());
    assert_eq!(first.updated, second.updated);
    assert_eq!(first.publish, draft.publish);
}

#[tokio::test]
async fn test_edit_updates_content_and_tags() {
    let fx = Fixture::new().await;
    let post = fx.published("Hello", day(1), &["Old"]).await;

    let edited = fx
        .service
        .edit_post(
            post.id,
            PostEdit {
                title: Some("Hello again".to_string()),
                body: None,
                tags: Some(vec!["New".to_string()]),
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.title, "Hello again");
    assert_eq!(edited.slug, "hello");
    assert_eq!(edited.body, post.body);
    assert!(edited.updated >= post.updated);

    let detail = fx
        .service
        .post_detail(date_of(&edited), "hello")
        .await
        .unwrap();
    let tags: Vec<&str> = detail.post.tags.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(tags, ["new"]);
}

#[tokio::test]
async fn test_edit_unknown_post_is_not_found() {
    let fx = Fixture::new().await;

    let result = fx
        .service
        .edit_post(Uuid::new_v4(), PostEdit::default())
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_store_rejects_duplicate_username() {
    let store = InMemoryStore::new();
    let users = store.users();
    users
        .create(User::new("ann".to_string(), "ann@example.com".to_string()))
        .await
        .unwrap();

    let result = users
        .create(User::new("ann".to_string(), "other@example.com".to_string()))
        .await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
    assert!(users.find_by_username("ann").await.unwrap().is_some());
}

#[tokio::test]
async fn test_store_update_missing_post() {
    let store = InMemoryStore::new();
    let post = Post::new(
        Uuid::new_v4(),
        "Ghost".to_string(),
        "ghost".to_string(),
        "Body".to_string(),
    );

    let result = store.posts().update(post).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
    assert!(store.posts().all_posts().await.unwrap().is_empty());
}
