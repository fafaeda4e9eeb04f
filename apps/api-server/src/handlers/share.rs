//! Share-by-email endpoints.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use blog_core::forms::SharePostForm;
use blog_shared::ApiResponse;

use super::render;
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

/// Scheme and host the client addressed, for absolute post URLs.
fn base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// The empty share form of a published post.
///
/// GET /blog/{post_id}/share
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let page = state.blog.share_form(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(render::share(page))))
}

/// POST /blog/{post_id}/share
pub async fn share_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Json<SharePostForm>,
    req: HttpRequest,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let page = state
        .blog
        .share_post(post_id, form.into_inner(), &base_url(&req))
        .await?;

    if page.sent {
        tracing::info!(request_id = %request_id.as_str(), post_id = %post_id, "Share sent");
        Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
            render::share(page),
            "Post shared",
        )))
    } else {
        Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::invalid(render::share(page))))
    }
}
