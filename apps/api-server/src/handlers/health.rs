//! Health check endpoint.

use actix_web::HttpResponse;
use posts_shared::dto::HealthResponse;

/// Liveness only; never touches the database.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { ok: true })
}
