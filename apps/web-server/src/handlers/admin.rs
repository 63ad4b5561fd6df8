//! Staff-only operations.

use actix_web::{HttpResponse, web};
use serde_json::json;

use yatube_core::domain::ROLE_ADMIN;

use crate::middleware::auth::Identity;
use crate::middleware::error::{ApiError, AppError};
use crate::observability::RequestId;
use crate::state::AppState;

/// POST /admin/cache/clear/ - drop every cached page so listings re-render.
pub async fn clear_cache(
    identity: Identity,
    request_id: RequestId,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Some(request_id.as_str().to_string());

    if !identity.has_role(ROLE_ADMIN) {
        tracing::warn!(username = %identity.username, "Cache flush refused");
        return Err(ApiError::new(AppError::Forbidden, request_id));
    }

    state
        .page_cache
        .flush()
        .await
        .map_err(|e| ApiError::new(e, request_id))?;

    tracing::info!(username = %identity.username, "Page cache cleared");
    Ok(HttpResponse::Ok().json(json!({ "status": "cleared" })))
}
