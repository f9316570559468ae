//! Action error type with IntoResponse
//!
//! Every failure surfaces to the caller as `{"error": "<message>"}` with a
//! matching status. Storage errors are logged server-side and reported as
//! a generic "failed to ..." without the underlying detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use contractorpay_core::models::ValidationError;

use crate::db::DbError;

/// Action error with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// A required field is missing or malformed (400)
    Validation(ValidationError),

    /// Resource id did not resolve (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint hit, e.g. a taken username (409)
    Conflict { message: String },

    /// No valid session cookie (401)
    NoSession,

    /// Username/password mismatch (401)
    InvalidCredentials,

    /// Session present but role check failed (403)
    Unauthorized,

    /// Storage error (500, logged, generic message)
    Database { action: &'static str, source: DbError },

    /// Anything else unexpected (500, logged, generic message)
    Internal { action: &'static str, message: String },
}

impl ApiError {
    /// Map a repository error for the given action. Not-found and
    /// duplicate rows keep their specific shape; everything else becomes
    /// a generic storage failure.
    pub fn db(action: &'static str, err: DbError) -> Self {
        match err {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Duplicate { resource, .. } => Self::Conflict {
                message: format!("{resource} already exists"),
            },
            other => Self::Database { action, source: other },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::NotFound { resource, .. } => {
                (StatusCode::NOT_FOUND, format!("{resource} not found"))
            }
            Self::Conflict { message } => (StatusCode::CONFLICT, message.clone()),
            Self::NoSession => (
                StatusCode::UNAUTHORIZED,
                "authentication required".to_string(),
            ),
            Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            Self::Unauthorized => (StatusCode::FORBIDDEN, "unauthorized".to_string()),
            Self::Database { action, source } => {
                tracing::error!(action, error = %source, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to {action}"),
                )
            }
            Self::Internal { action, message } => {
                tracing::error!(action, message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to {action}"),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "name" });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            resource: "worker",
            id: "123".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_session_is_401_and_role_failure_is_403() {
        assert_eq!(
            ApiError::NoSession.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn duplicate_maps_to_conflict() {
        let err = ApiError::db(
            "create user",
            DbError::Duplicate {
                resource: "username",
                value: "admin".into(),
            },
        );
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn storage_error_is_generic_500() {
        let err = ApiError::db(
            "create worker",
            DbError::Sqlx(sqlx::Error::PoolClosed),
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
