//! Post list and detail endpoints.

use actix_web::{HttpResponse, web};

use blog_core::domain::PostDate;
use blog_core::forms::CommentForm;
use blog_shared::ApiResponse;
use blog_shared::dto::ListQuery;

use super::render;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Published posts, three per page.
///
/// GET /blog?page=N
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let listing = state.blog.post_list(None, query.page.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::listing(listing))))
}

/// Published posts carrying a tag.
///
/// GET /blog/tag/{tag_slug}?page=N
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let tag_slug = path.into_inner();
    let listing = state
        .blog
        .post_list(Some(&tag_slug), query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::listing(listing))))
}

/// GET /blog/{year}/{month}/{day}/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state
        .blog
        .post_detail(PostDate::new(year, month, day), &slug)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::detail(detail))))
}

/// Submit a comment. A rejected form comes back as 422 with the detail view
/// and its field errors.
///
/// POST /blog/{year}/{month}/{day}/{slug}
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
    form: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state
        .blog
        .add_comment(PostDate::new(year, month, day), &slug, form.into_inner())
        .await?;

    let created = detail.new_comment.is_some();
    let body = render::detail(detail);
    if created {
        Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(body, "Comment added")))
    } else {
        Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::invalid(body)))
    }
}
