//! Error type shared by every HTTP handler.
//!
//! Handlers return `Result<HttpResponse, ApiError>`; actix turns the error into
//! the usual `{ "success": false, "message": ... }` envelope. Internal failures
//! are logged here and reach the client only as a generic message.

use crate::services::files::parse::ParseError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ApiResponse;
use log::error;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to parse file: {0}")]
    Parse(#[from] ParseError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Database(_) | ApiError::Io(_) | ApiError::Json(_) | ApiError::Internal(_)
        )
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Parse(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Io(_) | ApiError::Json(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::failure(message))
    }
}
