//! Per-view results handed to the presentation layer.

use crate::domain::{Comment, PageInfo, Post, SimilarPost, Tag};
use crate::forms::FieldErrors;

/// A post with the data needed to display it in a listing.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub post: Post,
    /// Author's username, `None` if the author record is gone.
    pub author: Option<String>,
    pub tags: Vec<Tag>,
}

/// One page of the published post list.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Vec<PostCard>,
    pub page: PageInfo,
    /// The tag the listing is restricted to, if any.
    pub tag: Option<Tag>,
}

/// A post's detail page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostCard,
    /// Active comments, oldest first.
    pub comments: Vec<Comment>,
    /// The comment created by this request, if a submission succeeded.
    pub new_comment: Option<Comment>,
    /// Field errors of a rejected comment submission.
    pub comment_errors: FieldErrors,
    pub similar_posts: Vec<SimilarPost>,
}

/// The share-by-email page.
#[derive(Debug, Clone)]
pub struct SharePage {
    pub post: Post,
    pub sent: bool,
    pub errors: FieldErrors,
}
