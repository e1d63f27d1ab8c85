//! Unified error handling with Sentry integration.
//!
//! Every handler returns [`Result<T>`]. Errors render as a JSON body
//! `{"status": <code>, "detail": <message>}`; server-side failures are
//! captured to Sentry and their details are withheld from the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation. Reported as 400.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body could not be extracted.
    #[error("Validation error: {detail}")]
    Validation { status: StatusCode, detail: String },
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Not found".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::Invalid(msg) => Self::BadRequest(msg),
            RepositoryError::InsufficientStock(available) => {
                Self::BadRequest(format!("Only {available} simcards available"))
            }
            other @ (RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                Self::Database(other)
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    detail: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => "Username already exists".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::NotFound(msg) | Self::Conflict(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Validation { detail, .. } => detail.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            status: status.as_u16(),
            detail: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
