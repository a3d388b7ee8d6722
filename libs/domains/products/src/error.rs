use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_helpers::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ProductError::NotFound(term) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("Product with term '{}' not found", term),
            ),
            ProductError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg.clone()),
            ProductError::Validation(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg.clone()),
            ProductError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_type.to_string(),
                message,
                details: None,
            }),
        )
            .into_response()
    }
}
