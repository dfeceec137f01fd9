use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation errors (malformed or out-of-range field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Categorical value outside the fitted vocabulary
    #[error("Unknown category for field '{field}': '{value}'")]
    UnknownCategory { field: String, value: String },

    /// Training set empty or too small to split
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Row cannot be converted to a feature vector
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownCategory { .. } => StatusCode::BAD_REQUEST,
            AppError::InsufficientData(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            AppError::InsufficientData(_) => "INSUFFICIENT_DATA",
            AppError::Encoding(_) => "ENCODING_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
