//! Health check endpoint.

use actix_web::HttpResponse;

use yatube_shared::HealthResponse;

/// Health check endpoint - returns server status.
///
/// GET /health/
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
