//! In-memory repositories - used when no database is configured.
//!
//! All repositories handed out by one [`InMemoryStore`] share the same tables,
//! so a post created through one is visible to the others.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Comment, Post, SimilarPost, Tag, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    /// Insertion order doubles as creation order.
    comments: Vec<Comment>,
    tags: HashMap<Uuid, Tag>,
    /// (post_id, tag_id) pairs.
    post_tags: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn has_tag(&self, post_id: Uuid, tag_id: Uuid) -> bool {
        self.post_tags.contains(&(post_id, tag_id))
    }

    /// Published posts, newest first.
    fn published(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.values().filter(|p| p.is_published()).collect();
        posts.sort_by(|a, b| b.publish.cmp(&a.publish).then(b.id.cmp(&a.id)));
        posts
    }

    fn published_tagged(&self, tag_id: Option<Uuid>) -> Vec<&Post> {
        self.published()
            .into_iter()
            .filter(|p| tag_id.is_none_or(|tag_id| self.has_tag(p.id, tag_id)))
            .collect()
    }

    fn slug_taken(&self, slug: &str, date: NaiveDate, exclude: Option<Uuid>) -> bool {
        self.posts.values().any(|p| {
            p.slug == slug && p.publish_date() == date && Some(p.id) != exclude
        })
    }
}

type SharedTables = Arc<RwLock<Tables>>;

/// Shared in-memory tables for users, posts, comments and tags.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: SharedTables,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            tables: self.tables.clone(),
        }
    }

    /// Flip a comment's moderation flag.
    pub async fn set_comment_active(&self, comment_id: Uuid, active: bool) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(RepoError::NotFound)?;
        comment.active = active;
        comment.updated = chrono::Utc::now();
        Ok(())
    }
}

pub struct InMemoryUserRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id)
            || tables.users.values().any(|u| u.username == user.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

pub struct InMemoryPostRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if tables.slug_taken(&post.slug, post.publish_date(), None) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug,
                post.publish_date()
            )));
        }
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if tables.slug_taken(&post.slug, post.publish_date(), Some(post.id)) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug,
                post.publish_date()
            )));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn all_posts(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.publish.cmp(&a.publish).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn published_posts(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.published().into_iter().cloned().collect())
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .filter(|p| p.is_published())
            .cloned())
    }

    async fn find_published_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published()
            .into_iter()
            .find(|p| p.slug == slug && p.publish_date() == date)
            .cloned())
    }

    async fn count_published(&self, tag_id: Option<Uuid>) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.published_tagged(tag_id).len() as u64)
    }

    async fn published_window(
        &self,
        tag_id: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published_tagged(tag_id)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn slug_taken(
        &self,
        slug: &str,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.slug_taken(slug, date, exclude))
    }

    async fn published_sharing_tags(
        &self,
        tag_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<Vec<SimilarPost>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published()
            .into_iter()
            .filter(|p| p.id != exclude)
            .filter_map(|p| {
                let same_tags = tag_ids
                    .iter()
                    .filter(|tag_id| tables.has_tag(p.id, **tag_id))
                    .count() as u32;
                (same_tags > 0).then(|| SimilarPost {
                    post: p.clone(),
                    same_tags,
                })
            })
            .collect())
    }
}

pub struct InMemoryCommentRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => {
                *existing = comment.clone();
                Ok(comment)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created);
        Ok(comments)
    }
}

pub struct InMemoryTagRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn create(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.contains_key(&tag.id) || tables.tags.values().any(|t| t.slug == tag.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.tags.get_mut(&tag.id) {
            Some(existing) => {
                *existing = tag.clone();
                Ok(tag)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, tag_id)| tables.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn set_post_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id)
            || tag_ids.iter().any(|id| !tables.tags.contains_key(id))
        {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }

        tables.post_tags.retain(|(p, _)| *p != post_id);
        for tag_id in tag_ids {
            if !tables.has_tag(post_id, *tag_id) {
                tables.post_tags.push((post_id, *tag_id));
            }
        }
        Ok(())
    }
}
