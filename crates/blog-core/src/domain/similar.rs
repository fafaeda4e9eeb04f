use std::cmp::Reverse;

use serde::Serialize;
use uuid::Uuid;

use super::Post;

/// Maximum number of recommendations on a detail page.
pub const SIMILAR_POSTS_LIMIT: usize = 4;

/// A post recommended because it shares tags with another post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarPost {
    pub post: Post,
    pub same_tags: u32,
}

/// Rank recommendation candidates for the post `current`.
///
/// Drops the post itself, unpublished posts and posts without a shared tag,
/// then orders by shared-tag count and recency, both descending.
pub fn rank_similar(
    candidates: Vec<SimilarPost>,
    current: Uuid,
    limit: usize,
) -> Vec<SimilarPost> {
    let mut ranked: Vec<SimilarPost> = candidates
        .into_iter()
        .filter(|c| c.post.id != current && c.post.is_published() && c.same_tags > 0)
        .collect();

    ranked.sort_by_key(|c| (Reverse(c.same_tags), Reverse(c.post.publish)));
    ranked.truncate(limit);
    ranked
}
