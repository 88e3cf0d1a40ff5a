//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses.

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use course_platform_core::PortError;
use serde_json::json;

use crate::auth::AuthError;
use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the store, policy or reporter.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Credential and token failures.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request payload failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The request body, query string or path could not be decoded.
    #[error("{message}")]
    Rejection { status: StatusCode, message: String },

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Port(port) => match port {
                PortError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
                PortError::Duplicate(_) => (StatusCode::BAD_REQUEST, "DUPLICATE"),
                PortError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                PortError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                PortError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                PortError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            ApiError::Auth(auth) => match auth {
                AuthError::InactiveUser => (StatusCode::FORBIDDEN, "INACTIVE_USER"),
                AuthError::Hashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
                _ => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            },
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Rejection { status, .. } if *status == StatusCode::UNPROCESSABLE_ENTITY => {
                (*status, "VALIDATION_ERROR")
            }
            ApiError::Rejection { status, .. } => (*status, "INVALID_REQUEST"),
            ApiError::Database(sqlx::Error::RowNotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(impl From<$rejection> for ApiError {
            fn from(rejection: $rejection) -> Self {
                ApiError::Rejection {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
            }
        })+
    };
}

from_rejection!(JsonRejection, FormRejection, QueryRejection, PathRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = axum::Json(json!({
            "error": message,
            "code": code,
        }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
