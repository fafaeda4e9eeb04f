//! HTTP handlers and route configuration.

mod health;
mod posts;
mod render;
mod share;


use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _| {
        error::Error::from(AppError::NotFound(err.to_string()))
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .service(web::scope("/api").route("/health", web::get().to(health::health_check)))
    .service(
        web::scope("/blog")
            .route("", web::get().to(posts::post_list))
            .route("/", web::get().to(posts::post_list))
            .route("/tag/{tag_slug}", web::get().to(posts::post_list_by_tag))
            .route("/{post_id}/share", web::get().to(share::share_form))
            .route("/{post_id}/share", web::post().to(share::share_post))
            .route(
                "/{year}/{month}/{day}/{slug}",
                web::get().to(posts::post_detail),
            )
            .route(
                "/{year}/{month}/{day}/{slug}",
                web::post().to(posts::add_comment),
            ),
    );
}
