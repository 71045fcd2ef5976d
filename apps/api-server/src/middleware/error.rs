//! Error handling - maps every failure to a `{ "error": ... }` JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use posts_core::DomainError;
use posts_shared::ErrorResponse;
use std::fmt;

/// Application-level error type, the only error handlers return.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest { message: String, fields: Vec<String> },
    /// Message is shown to the client as is; details must be logged beforehand.
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(msg) | AppError::Internal(msg) => ErrorResponse::new(msg),
            AppError::BadRequest { message, fields } => {
                ErrorResponse::new(message).with_fields(fields.iter().cloned())
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Store failure message for handlers that propagate with a bare `?` instead
/// of [`OrStoreFailure::or_store_failure`].
const GENERIC_STORE_FAILURE: &str = "Error interno del servidor";

// Conversion from domain errors. Validation and not-found outcomes always go
// through here; store failures only when no operation message was attached.
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message, fields } => AppError::BadRequest {
                message,
                fields: fields.into_iter().map(String::from).collect(),
            },
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} no encontrado", entity_type))
            }
            DomainError::Store(source) => {
                tracing::error!(error = %source, "Store failure");
                AppError::Internal(GENERIC_STORE_FAILURE.to_string())
            }
        }
    }
}

/// Attach the client-facing message used when an operation hits a store failure.
pub trait OrStoreFailure<T> {
    fn or_store_failure(self, message: &'static str) -> AppResult<T>;
}

impl<T> OrStoreFailure<T> for Result<T, DomainError> {
    fn or_store_failure(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| match err {
            DomainError::Store(source) => {
                tracing::error!(error = %source, "{}", message);
                AppError::Internal(message.to_string())
            }
            other => other.into(),
        })
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
