//! Demo content for the in-memory store.

use chrono::{Duration, Utc};

use blog_core::domain::User;
use blog_core::forms::NewPost;
use blog_core::ports::BaseRepository;
use blog_core::{BlogService, DomainError};
use blog_infra::InMemoryStore;

struct DemoPost {
    title: &'static str,
    body: &'static str,
    tags: &'static [&'static str],
    days_ago: i64,
    published: bool,
}

const DEMO_POSTS: &[DemoPost] = &[
    DemoPost {
        title: "Who was Django Reinhardt?",
        body: "Django Reinhardt was a Belgian-born jazz guitarist.",
        tags: &["music", "jazz"],
        days_ago: 9,
        published: true,
    },
    DemoPost {
        title: "Gypsy jazz for beginners",
        body: "Start with the rest stroke and a lot of patience.",
        tags: &["music", "jazz", "guitar"],
        days_ago: 7,
        published: true,
    },
    DemoPost {
        title: "Choosing a Selmer-style guitar",
        body: "Oval hole or D hole? It depends on what you play.",
        tags: &["guitar"],
        days_ago: 5,
        published: true,
    },
    DemoPost {
        title: "Notes from the festival",
        body: "Three days of swing in Samois-sur-Seine.",
        tags: &["music", "travel"],
        days_ago: 2,
        published: true,
    },
    DemoPost {
        title: "Unfinished thoughts",
        body: "This one is not ready yet.",
        tags: &["music"],
        days_ago: 0,
        published: false,
    },
];

/// Create a demo author and a handful of posts.
pub async fn demo_data(blog: &BlogService, store: &InMemoryStore) -> Result<(), DomainError> {
    let author = store
        .users()
        .create(User::new("admin".to_string(), "admin@myblog.com".to_string()))
        .await?;

    let now = Utc::now();
    for demo in DEMO_POSTS {
        let post = blog
            .create_post(NewPost {
                author_id: author.id,
                title: demo.title.to_string(),
                slug: None,
                body: demo.body.to_string(),
                tags: demo.tags.iter().map(|t| t.to_string()).collect(),
                publish: Some(now - Duration::days(demo.days_ago)),
            })
            .await?;

        if demo.published {
            blog.publish_post(post.id).await?;
        }
    }

    tracing::info!(posts = DEMO_POSTS.len(), "Demo data seeded");
    Ok(())
}
