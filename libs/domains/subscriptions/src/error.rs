use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("Subscription not found: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type SubscriptionResult<T> = Result<T, SubscriptionError>;

/// Convert SubscriptionError to AppError for standardized error responses
impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::NotFound(id) => {
                AppError::NotFound(format!("Subscription {} not found", id))
            }
            SubscriptionError::Validation(msg) => AppError::BadRequest(msg),
            SubscriptionError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for SubscriptionError {
    fn from(err: sea_orm::DbErr) -> Self {
        SubscriptionError::Database(err.to_string())
    }
}
