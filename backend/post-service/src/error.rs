/// Error types for Post Service
///
/// The post store never raises these; absence there is an `Option`. The
/// service layer turns absence and ownership violations into `AppError`,
/// which converts to an HTTP response at the handler boundary.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for post-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced post or user does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Edit attempted by someone other than the post owner
    #[error("Invalid owner: {0}")]
    InvalidOwner(String),

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict (duplicate resource, etc.)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidOwner(_) => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
