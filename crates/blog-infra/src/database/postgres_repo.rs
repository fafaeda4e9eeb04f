//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::Query;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostDate, SimilarPost, Tag, User};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_err, write_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

/// Published posts, newest first.
fn published() -> Select<PostEntity> {
    PostEntity::find()
        .filter(post::Column::Status.eq(post::Status::Published))
        .order_by_desc(post::Column::Publish)
        .order_by_desc(post::Column::Id)
}

/// Restrict a post query to posts carrying `tag_id`.
fn tagged(select: Select<PostEntity>, tag_id: Option<Uuid>) -> Select<PostEntity> {
    match tag_id {
        Some(tag_id) => select.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(PostTagEntity)
                    .and_where(post_tag::Column::TagId.eq(tag_id))
                    .to_owned(),
            ),
        ),
        None => select,
    }
}

/// Restrict a post query to posts published on `date` (UTC).
///
/// `None` when the day has no upper bound; no post can be published on it.
fn published_on(select: Select<PostEntity>, date: NaiveDate) -> Option<Select<PostEntity>> {
    let (start, end) = PostDate::day_bounds(date)?;
    Some(
        select
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end)),
    )
}

fn into_posts(models: Vec<post::Model>) -> Vec<Post> {
    models.into_iter().map(Into::into).collect()
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn all_posts(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::Publish)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(into_posts(result))
    }

    async fn published_posts(&self) -> Result<Vec<Post>, RepoError> {
        let result = published().all(&self.db).await.map_err(query_err)?;

        Ok(into_posts(result))
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = published()
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_published_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        tracing::debug!(%date, slug, "Finding published post by date and slug");

        let Some(select) = published_on(published(), date) else {
            return Ok(None);
        };

        let result = select
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn count_published(&self, tag_id: Option<Uuid>) -> Result<u64, RepoError> {
        tagged(published(), tag_id)
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn published_window(
        &self,
        tag_id: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = tagged(published(), tag_id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(into_posts(result))
    }

    async fn slug_taken(
        &self,
        slug: &str,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let Some(select) = published_on(PostEntity::find(), date) else {
            return Ok(false);
        };

        let mut select = select.filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            select = select.filter(post::Column::Id.ne(id));
        }

        let count = select.count(&self.db).await.map_err(query_err)?;
        Ok(count > 0)
    }

    async fn published_sharing_tags(
        &self,
        tag_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<Vec<SimilarPost>, RepoError> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let links = PostTagEntity::find()
            .filter(post_tag::Column::TagId.is_in(tag_ids.iter().copied()))
            .filter(post_tag::Column::PostId.ne(exclude))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut shared: HashMap<Uuid, u32> = HashMap::new();
        for link in links {
            *shared.entry(link.post_id).or_default() += 1;
        }
        if shared.is_empty() {
            return Ok(Vec::new());
        }

        let posts = published()
            .filter(post::Column::Id.is_in(shared.keys().copied()))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(posts
            .into_iter()
            .map(|model| SimilarPost {
                same_tags: shared.get(&model.id).copied().unwrap_or_default(),
                post: model.into(),
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        tracing::debug!(post_id = %post_id, count = result.len(), "Loaded active comments");

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(links.into_iter().map(|l| l.tag_id)))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_post_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(write_err)?;

        if !tag_ids.is_empty() {
            let links = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(*tag_id),
            });
            PostTagEntity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(write_err)?;
        }

        txn.commit().await.map_err(write_err)?;
        Ok(())
    }
}
