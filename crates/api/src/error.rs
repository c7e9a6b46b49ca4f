//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! Every error renders as a JSON object with a `message`. Validation failures
//! add an `errors` array listing each field violation.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use fitness_diary_core::ValidationErrors;

use crate::db::RepositoryError;

/// Application-level error type for the diary service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request (unparseable body, path or query).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ViolationBody<'a>>>,
}

#[derive(Serialize)]
struct ViolationBody<'a> {
    field: &'a str,
    kind: &'a str,
    message: String,
}

fn violations(errors: &ValidationErrors) -> Vec<ViolationBody<'_>> {
    errors
        .iter()
        .map(|v| ViolationBody {
            field: v.field,
            kind: v.kind.code(),
            message: v.to_string(),
        })
        .collect()
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Validation(_) | RepositoryError::Constraint(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Validation(errors) | Self::Repository(RepositoryError::Validation(errors)) => {
                ErrorBody {
                    message: "Validation failed".to_string(),
                    errors: Some(violations(errors)),
                }
            }
            Self::Repository(RepositoryError::NotFound) => ErrorBody {
                message: "Not found".to_string(),
                errors: None,
            },
            Self::Repository(RepositoryError::Conflict(msg)) => ErrorBody {
                message: msg.clone(),
                errors: None,
            },
            Self::Repository(RepositoryError::Constraint(constraint)) => ErrorBody {
                message: format!("Constraint violated: {constraint}"),
                errors: None,
            },
            Self::Repository(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
            | Self::Internal(_) => ErrorBody {
                message: "Internal server error".to_string(),
                errors: None,
            },
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => ErrorBody {
                message: msg.clone(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
