use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use school_chat_common::ChatbotError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A core service failed; `message` is what the client sees for non-validation failures.
    #[error("{message}: {source}")]
    Service {
        message: &'static str,
        source: ChatbotError,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Service { source, .. } if source.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Service { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, error_code) = match self {
            ApiError::Validation(msg) => (msg, "VALIDATION_ERROR"),
            ApiError::Service {
                source: ChatbotError::Validation(msg),
                ..
            } => (msg, "VALIDATION_ERROR"),
            ApiError::Service { message, source } => {
                error!("{}: {}", message, source);
                (message.to_string(), "INTERNAL_ERROR")
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ("Internal server error".to_string(), "INTERNAL_ERROR")
            }
        };

        let response_body = json!({
            "error": error_message,
            "error_code": error_code,
        });

        (status, Json(response_body)).into_response()
    }
}

// Helper function to create validation errors
pub fn validation_error(message: &str) -> ApiError {
    ApiError::Validation(message.to_string())
}

/// Adapter for `map_err` that tags a core failure with the client-facing message.
pub fn service_error(message: &'static str) -> impl FnOnce(ChatbotError) -> ApiError {
    move |source| ApiError::Service { message, source }
}

// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
