//! Application error types and their HTTP status mapping.
//!
//! This is the single place where internal failure kinds become
//! caller-visible responses: every identity-resolution failure collapses
//! to 401 with one generic message, while not-found (404) and ownership
//! (403) stay distinct.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;
use tally_core::auth::AuthError;
use tally_core::auth::identity::AuthFailure;
use tally_core::todos::TodoError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Db(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(e: AuthFailure) -> Self {
        match e {
            // Infrastructure failure during lookup, not a denial.
            AuthFailure::Store(e) => AppError::from(e),
            // One indistinguishable 401 for every denial kind.
            AuthFailure::MissingToken
            | AuthFailure::MalformedHeader
            | AuthFailure::InvalidOrExpiredToken
            | AuthFailure::UnknownSubject => {
                AppError::Unauthorized("Authentication required".into())
            }
        }
    }
}

impl From<TodoError> for AppError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::NotFound(id) => AppError::NotFound(format!("todo {id} does not exist")),
            TodoError::Forbidden(_) => AppError::Forbidden("You do not own this todo".into()),
            TodoError::Validation(msg) => AppError::Validation(msg),
            TodoError::Db(e) => AppError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::auth::ownership::check_ownership;

    fn status_of(e: AppError) -> StatusCode {
        e.into_response().status()
    }

    #[test]
    fn every_auth_failure_maps_to_401() {
        for failure in [
            AuthFailure::MissingToken,
            AuthFailure::MalformedHeader,
            AuthFailure::InvalidOrExpiredToken,
            AuthFailure::UnknownSubject,
        ] {
            assert_eq!(status_of(AppError::from(failure)), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn auth_failures_share_one_message() {
        let a = AppError::from(AuthFailure::MissingToken);
        let b = AppError::from(AuthFailure::UnknownSubject);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn store_failure_is_not_a_denial() {
        let failure = AuthFailure::Store(AuthError::Internal("boom".into()));
        assert_eq!(
            status_of(AppError::from(failure)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn todo_errors_keep_404_and_403_distinct() {
        assert_eq!(
            status_of(AppError::from(TodoError::NotFound(9))),
            StatusCode::NOT_FOUND
        );
        let violation = check_ownership(1, 2).unwrap_err();
        assert_eq!(
            status_of(AppError::from(TodoError::Forbidden(violation))),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            status_of(AppError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }
}
