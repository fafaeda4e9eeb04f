//! Mapping from service views to wire DTOs.

use blog_core::domain::{Comment, PageInfo, Post, SimilarPost, Tag};
use blog_core::services::{PostCard, PostDetail, PostListing, SharePage};
use blog_shared::dto::{
    CommentResponse, PageResponse, PostDetailResponse, PostListResponse, PostResponse,
    PostSummary, SharePostResponse, SimilarPostResponse, TagResponse,
};

fn tag(tag: Tag) -> TagResponse {
    TagResponse {
        name: tag.name,
        slug: tag.slug,
    }
}

fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        name: comment.name,
        body: comment.body,
        created: comment.created,
    }
}

fn page(page: PageInfo) -> PageResponse {
    PageResponse {
        number: page.number,
        num_pages: page.num_pages,
        per_page: page.per_page,
        total: page.total,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }
}

fn summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        publish: post.publish,
        url: post.absolute_path(),
    }
}

fn similar(similar: SimilarPost) -> SimilarPostResponse {
    SimilarPostResponse {
        post: summary(&similar.post),
        same_tags: similar.same_tags,
    }
}

pub fn post(card: PostCard) -> PostResponse {
    let url = card.post.absolute_path();
    let post = card.post;
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        author: card.author,
        body: post.body,
        publish: post.publish,
        created: post.created,
        updated: post.updated,
        status: post.status.to_string(),
        url,
        tags: card.tags.into_iter().map(tag).collect(),
    }
}

pub fn listing(listing: PostListing) -> PostListResponse {
    PostListResponse {
        posts: listing.posts.into_iter().map(post).collect(),
        page: page(listing.page),
        tag: listing.tag.map(tag),
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        comments: detail.comments.into_iter().map(comment).collect(),
        new_comment: detail.new_comment.map(comment),
        comment_errors: detail.comment_errors.into_inner(),
        similar_posts: detail.similar_posts.into_iter().map(similar).collect(),
    }
}

pub fn share(page: SharePage) -> SharePostResponse {
    SharePostResponse {
        post: summary(&page.post),
        sent: page.sent,
        errors: page.errors.into_inner(),
    }
}
