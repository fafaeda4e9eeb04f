//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `postgres` or `memory`.
    pub storage: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (status, storage) = match &state.db {
        #[cfg(feature = "postgres")]
        Some(db) => match db.main.ping().await {
            Ok(()) => ("ok", "postgres"),
            Err(e) => {
                tracing::error!(error = %e, "Database ping failed");
                ("degraded", "postgres")
            }
        },
        #[cfg(not(feature = "postgres"))]
        Some(_) => ("ok", "postgres"),
        None => ("ok", "memory"),
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if status == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
