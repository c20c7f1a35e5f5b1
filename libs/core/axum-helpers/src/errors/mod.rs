pub mod handlers;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for all error responses so clients get a consistent shape:
/// - `error`: machine-readable error identifier (e.g., "NotFound")
/// - `message`: human-readable error message
/// - `details`: optional structured details (e.g., validation field errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "error": "NotFound",
///   "message": "Subscription 42 not found",
///   "details": null
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that converts to HTTP responses.
///
/// Integrates with common error types from dependencies; server faults
/// are logged at error level before being mapped, client faults at debug.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, details) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::debug!("JSON extraction error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "BadRequest",
                    e.body_text(),
                    None,
                )
            }
            AppError::ValidationError(errors) => {
                tracing::debug!("Validation error: {:?}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    "BadRequest",
                    "Request validation failed".to_string(),
                    Some(validation_details(&errors)),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    msg,
                    None,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ServiceUnavailable",
                    msg,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Render `validator` field errors as structured JSON for the `details`
/// member of an [`ErrorResponse`].
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let map = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = AppError::BadRequest("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("nothing here".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_maps_to_500() {
        let response = AppError::InternalServerError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_service_unavailable_maps_to_503() {
        let response = AppError::ServiceUnavailable("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_database_error_hides_internals() {
        let response = AppError::Database(DbErr::Custom("secret".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
