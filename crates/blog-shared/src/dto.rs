//! Data Transfer Objects - request/response types for the blog API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of the list views. The page is kept raw: any value is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

/// Field name to error messages.
pub type FieldErrorMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Author's username, absent if the author record is gone.
    pub author: Option<String>,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: String,
    /// Canonical path of the detail page.
    pub url: String,
    pub tags: Vec<TagResponse>,
}

/// A post as linked from another page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub publish: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPostResponse {
    #[serde(flatten)]
    pub post: PostSummary,
    pub same_tags: u32,
}

/// A comment as shown publicly. The commenter's email is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: PageResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    /// Set when this request added a comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_comment: Option<CommentResponse>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub comment_errors: FieldErrorMap,
    pub similar_posts: Vec<SimilarPostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePostResponse {
    pub post: PostSummary,
    pub sent: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub errors: FieldErrorMap,
}
