//! HTTP handlers and route configuration.

mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{Error, HttpRequest, HttpResponse, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list_posts))
                .route("", web::post().to(posts::create_post))
                .route("/{id}", web::get().to(posts::get_post))
                .route("/{id}", web::put().to(posts::update_post))
                .route("/{id}", web::delete().to(posts::delete_post)),
        );
}

/// Fallback for unknown routes.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Ruta no encontrada".to_string()))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    tracing::debug!(error = %err, "Rejected request body");
    AppError::bad_request(format!("JSON inválido: {}", err)).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> Error {
    tracing::debug!(error = %err, "Rejected path parameter");
    AppError::bad_request("id inválido").into()
}
