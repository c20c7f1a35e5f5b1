use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ErrorResponse;

/// Handler for 404 Not Found errors.
///
/// Use as the router fallback for unmatched paths.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse {
        error: "NotFound".to_string(),
        message: "The requested resource was not found".to_string(),
        details: None,
    });

    (StatusCode::NOT_FOUND, body).into_response()
}
