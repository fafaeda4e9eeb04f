use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Comment, POSTS_PER_PAGE, PageInfo, Post, PostDate, SIMILAR_POSTS_LIMIT, SimilarPost, Tag,
    rank_similar,
};
use crate::error::DomainError;
use crate::forms::{CommentForm, FieldErrors, NewPost, PostEdit, SharePostForm, ValidShare};
use crate::pii::mask_email;
use crate::ports::{
    BaseRepository, CommentRepository, MailMessage, Mailer, PostRepository, TagRepository,
    UserRepository,
};

use super::views::{PostCard, PostDetail, PostListing, SharePage};

/// Tunables of the blog views.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub posts_per_page: u64,
    pub similar_limit: usize,
    /// Sender address of share-by-email messages.
    pub mail_from: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            posts_per_page: POSTS_PER_PAGE,
            similar_limit: SIMILAR_POSTS_LIMIT,
            mail_from: "admin@myblog.com".to_string(),
        }
    }
}

/// The blog's use cases: public views, comment and share submissions, and
/// the author operations that create and publish posts.
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    settings: BlogSettings,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            users,
            mailer,
            settings,
        }
    }

    pub async fn all_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.all_posts().await?)
    }

    pub async fn published_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.published_posts().await?)
    }

    /// One page of published posts, optionally restricted to a tag.
    pub async fn post_list(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let tag = match tag_slug {
            Some(slug) => Some(
                self.tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("tag", slug))?,
            ),
            None => None,
        };
        let tag_id = tag.as_ref().map(|t| t.id);

        let total = self.posts.count_published(tag_id).await?;
        let page = PageInfo::resolve(page, total, self.settings.posts_per_page);
        let posts = self
            .posts
            .published_window(tag_id, page.offset(), page.per_page)
            .await?;

        tracing::debug!(
            tag = tag_slug.unwrap_or("-"),
            page = page.number,
            num_pages = page.num_pages,
            "Listing posts"
        );

        let mut cards = Vec::with_capacity(posts.len());
        for post in posts {
            cards.push(self.card(post).await?);
        }

        Ok(PostListing {
            posts: cards,
            page,
            tag,
        })
    }

    pub async fn post_detail(&self, date: PostDate, slug: &str) -> Result<PostDetail, DomainError> {
        let post = self.published_by_date(date, slug).await?;
        self.detail(post, None, FieldErrors::new()).await
    }

    /// Submit a comment on a published post.
    ///
    /// An invalid form is not an error: the detail page comes back with the
    /// field errors filled in and nothing is stored.
    pub async fn add_comment(
        &self,
        date: PostDate,
        slug: &str,
        form: CommentForm,
    ) -> Result<PostDetail, DomainError> {
        let post = self.published_by_date(date, slug).await?;

        match form.clean() {
            Ok(valid) => {
                let comment = Comment::new(post.id, valid.name, valid.email, valid.body);
                let saved = self.comments.create(comment).await?;
                tracing::info!(
                    post_id = %post.id,
                    comment_id = %saved.id,
                    email = %mask_email(&saved.email),
                    "Comment created"
                );
                self.detail(post, Some(saved), FieldErrors::new()).await
            }
            Err(errors) => {
                tracing::debug!(post_id = %post.id, %errors, "Comment rejected");
                self.detail(post, None, errors).await
            }
        }
    }

    /// The empty share form of a published post.
    pub async fn share_form(&self, post_id: Uuid) -> Result<SharePage, DomainError> {
        let post = self.published_by_id(post_id).await?;
        Ok(SharePage {
            post,
            sent: false,
            errors: FieldErrors::new(),
        })
    }

    /// Email a published post to the submitted recipient.
    ///
    /// `base_url` is the scheme and host the post URL in the message is built on.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        form: SharePostForm,
        base_url: &str,
    ) -> Result<SharePage, DomainError> {
        let post = self.published_by_id(post_id).await?;

        let share = match form.clean() {
            Ok(share) => share,
            Err(errors) => {
                tracing::debug!(post_id = %post.id, %errors, "Share rejected");
                return Ok(SharePage {
                    post,
                    sent: false,
                    errors,
                });
            }
        };

        let message = self.share_message(&post, &share, base_url);
        self.mailer.send(message).await?;

        tracing::info!(
            post_id = %post.id,
            to = %mask_email(&share.to),
            "Post shared by email"
        );

        Ok(SharePage {
            post,
            sent: true,
            errors: FieldErrors::new(),
        })
    }

    /// Compose the recommendation message for a shared post.
    pub fn share_message(&self, post: &Post, share: &ValidShare, base_url: &str) -> MailMessage {
        let post_url = format!("{}{}", base_url.trim_end_matches('/'), post.absolute_path());
        MailMessage {
            subject: format!(
                "{} ({}) recommends you reading \"{}\"",
                share.name, share.email, post.title
            ),
            body: format!(
                "Read \"{}\" at {}\n\n{}'s comments: {}",
                post.title,
                post_url,
                share.name,
                share.comments.as_deref().unwrap_or("")
            ),
            from: self.settings.mail_from.clone(),
            to: vec![share.to.clone()],
        }
    }

    /// Create a draft post.
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, DomainError> {
        let valid = new_post.clean().map_err(DomainError::Validation)?;

        if self.users.find_by_id(valid.author_id).await?.is_none() {
            return Err(DomainError::not_found("user", valid.author_id));
        }

        let mut post = Post::new(valid.author_id, valid.title, valid.slug, valid.body);
        if let Some(publish) = valid.publish {
            post.publish = publish;
        }

        if self
            .posts
            .slug_taken(&post.slug, post.publish_date(), None)
            .await?
        {
            return Err(DomainError::Duplicate(format!(
                "slug '{}' is already used on {}",
                post.slug,
                post.publish_date()
            )));
        }

        let post = self.posts.create(post).await?;
        self.attach_tags(post.id, &valid.tags).await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Apply an author's edit to a post of any status.
    pub async fn edit_post(&self, post_id: Uuid, edit: PostEdit) -> Result<Post, DomainError> {
        let edit = edit.clean().map_err(DomainError::Validation)?;
        let mut post = self.existing(post_id).await?;

        if let Some(title) = edit.title {
            post.title = title;
        }
        if let Some(body) = edit.body {
            post.body = body;
        }
        post.touch();

        let post = self.posts.update(post).await?;
        if let Some(tags) = edit.tags {
            self.attach_tags(post.id, &tags).await?;
        }

        tracing::info!(post_id = %post.id, "Post edited");
        Ok(post)
    }

    /// Move a draft to published. Publishing a published post is a no-op.
    pub async fn publish_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        let mut post = self.existing(post_id).await?;
        if post.is_published() {
            return Ok(post);
        }

        post.mark_published();
        let post = self.posts.update(post).await?;

        tracing::info!(post_id = %post.id, url = %post.absolute_path(), "Post published");
        Ok(post)
    }

    async fn existing(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn published_by_id(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_published_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn published_by_date(&self, date: PostDate, slug: &str) -> Result<Post, DomainError> {
        let not_found = || DomainError::not_found("post", format!("{date}/{slug}"));
        let day = date
            .to_date()
            .filter(|day| PostDate::day_bounds(*day).is_some())
            .ok_or_else(not_found)?;
        self.posts
            .find_published_by_date_and_slug(day, slug)
            .await?
            .ok_or_else(not_found)
    }

    async fn card(&self, post: Post) -> Result<PostCard, DomainError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .map(|user| user.username);
        let tags = self.tags.tags_for_post(post.id).await?;
        Ok(PostCard { post, author, tags })
    }

    async fn detail(
        &self,
        post: Post,
        new_comment: Option<Comment>,
        comment_errors: FieldErrors,
    ) -> Result<PostDetail, DomainError> {
        let comments = self.comments.active_for_post(post.id).await?;
        let card = self.card(post).await?;
        let similar_posts = self.similar_posts(&card).await?;

        Ok(PostDetail {
            post: card,
            comments,
            new_comment,
            comment_errors,
            similar_posts,
        })
    }

    async fn similar_posts(&self, card: &PostCard) -> Result<Vec<SimilarPost>, DomainError> {
        if card.tags.is_empty() {
            return Ok(Vec::new());
        }

        let tag_ids: Vec<Uuid> = card.tags.iter().map(|t| t.id).collect();
        let candidates = self
            .posts
            .published_sharing_tags(&tag_ids, card.post.id)
            .await?;

        Ok(rank_similar(
            candidates,
            card.post.id,
            self.settings.similar_limit,
        ))
    }

    async fn attach_tags(&self, post_id: Uuid, names: &[String]) -> Result<(), DomainError> {
        let mut tag_ids = Vec::with_capacity(names.len());
        for name in names {
            let candidate = Tag::new(name.as_str());
            let tag = match self.tags.find_by_slug(&candidate.slug).await? {
                Some(existing) => existing,
                None => self.tags.create(candidate).await?,
            };
            tag_ids.push(tag.id);
        }

        self.tags.set_post_tags(post_id, &tag_ids).await?;
        Ok(())
    }
}
