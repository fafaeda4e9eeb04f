use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, SimilarPost, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining the standard record operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Every method except `all_posts` and `find_by_id` only sees published posts.
/// Listings are ordered by publish time, newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Every post regardless of status.
    async fn all_posts(&self) -> Result<Vec<Post>, RepoError>;

    async fn published_posts(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// The published post with `slug` whose publish time falls on `date` (UTC).
    async fn find_published_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Number of published posts, optionally only those carrying `tag_id`.
    async fn count_published(&self, tag_id: Option<Uuid>) -> Result<u64, RepoError>;

    /// A window of the published listing, optionally only posts carrying `tag_id`.
    async fn published_window(
        &self,
        tag_id: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Whether any post other than `exclude` already uses `slug` on `date`.
    async fn slug_taken(
        &self,
        slug: &str,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;

    /// Published posts carrying at least one of `tag_ids`, with the number of
    /// those tags each one carries. `exclude` is left out. Unordered.
    async fn published_sharing_tags(
        &self,
        tag_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<Vec<SimilarPost>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments on a post, oldest first.
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Tag repository, including the post/tag association.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Tags attached to a post, ordered by name.
    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    /// Replace the set of tags attached to a post.
    async fn set_post_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;
}
