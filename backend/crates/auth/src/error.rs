//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shared by unknown-email and wrong-password failures
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password absent from a login request
    #[error("Email or password missing")]
    MissingCredentials,

    /// Email is syntactically invalid
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Some other registration field failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Email or username already registered
    #[error("User already exists")]
    DuplicateUser,

    /// No account matches the email
    #[error("User not found")]
    UserNotFound,

    /// Password did not match the stored hash
    #[error("Invalid password")]
    InvalidPassword,

    /// No token presented, or the logout sentinel was presented
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Token signature, format or expiry check failed
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token is valid but its subject no longer resolves
    #[error("User no longer exists")]
    UserGone,

    /// Datastore unreachable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Datastore failure other than unavailability
    #[error("Storage error: {0}")]
    Storage(#[source] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidEmail(_) | AuthError::Validation(_) | AuthError::DuplicateUser => {
                ErrorKind::BadRequest
            }
            AuthError::MissingCredentials
            | AuthError::UserNotFound
            | AuthError::InvalidPassword
            | AuthError::NotAuthenticated
            | AuthError::InvalidToken
            | AuthError::UserGone => ErrorKind::Unauthorized,
            AuthError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Storage(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-readable code sent to clients
    ///
    /// `UserNotFound` and `InvalidPassword` share a code so responses do not
    /// reveal which accounts exist.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "MISSING_CREDENTIALS",
            AuthError::InvalidEmail(_) => "INVALID_EMAIL",
            AuthError::Validation(_) => "VALIDATION_FAILED",
            AuthError::DuplicateUser => "DUPLICATE_USER",
            AuthError::UserNotFound | AuthError::InvalidPassword => "INVALID_CREDENTIALS",
            AuthError::NotAuthenticated => "NOT_AUTHENTICATED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::UserGone => "USER_GONE",
            AuthError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AuthError::Storage(_) | AuthError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to show to the client
    fn public_message(&self) -> String {
        match self {
            AuthError::UserNotFound | AuthError::InvalidPassword => {
                INVALID_CREDENTIALS_MESSAGE.to_string()
            }
            AuthError::NotAuthenticated => "You are not logged in. Please log in.".to_string(),
            AuthError::UserGone => "The user belonging to this token no longer exists".to_string(),
            AuthError::ServiceUnavailable(_) => {
                "Service temporarily unavailable, please retry".to_string()
            }
            AuthError::Storage(_) | AuthError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let app_error = AppError::new(self.kind(), self.public_message()).with_code(self.code());
        match self {
            AuthError::MissingCredentials | AuthError::UserNotFound | AuthError::InvalidPassword => {
                app_error.with_action("Check your email and password")
            }
            AuthError::NotAuthenticated | AuthError::InvalidToken | AuthError::UserGone => {
                app_error.with_action("Please log in again")
            }
            _ => app_error,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::ServiceUnavailable(msg) => {
                tracing::error!(message = %msg, "Auth datastore unavailable");
            }
            AuthError::UserNotFound => {
                tracing::warn!("Login attempt for unknown email");
            }
            AuthError::InvalidPassword => {
                tracing::warn!("Login attempt with wrong password");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected invalid or expired token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::from(AppError::from(err))
    }
}

/// Storage failures arrive as kernel errors; their kind picks the variant
impl From<AppError> for AuthError {
    fn from(app_error: AppError) -> Self {
        match app_error.kind() {
            // Unique index on email or username
            ErrorKind::Conflict => AuthError::DuplicateUser,
            ErrorKind::ServiceUnavailable => {
                AuthError::ServiceUnavailable(app_error.message().to_string())
            }
            _ => AuthError::Storage(app_error),
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_codes() {
        let cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::MissingCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidEmail("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::DuplicateUser, StatusCode::BAD_REQUEST),
            (AuthError::UserNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidPassword, StatusCode::UNAUTHORIZED),
            (AuthError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::UserGone, StatusCode::UNAUTHORIZED),
            (
                AuthError::ServiceUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AuthError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_credential_failures_are_indistinguishable() {
        let not_found = AuthError::UserNotFound.to_app_error();
        let wrong_password = AuthError::InvalidPassword.to_app_error();

        assert_eq!(not_found.code(), wrong_password.code());
        assert_eq!(not_found.message(), wrong_password.message());
        assert_eq!(not_found.message(), "Invalid email or password");
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = AuthError::Internal("hash $argon2id$v=19$secret".into()).to_app_error();
        assert!(!err.message().contains("argon2"));
        assert_eq!(err.code(), "INTERNAL");
    }

    #[test]
    fn test_storage_errors_by_kind() {
        assert!(matches!(
            AuthError::from(AppError::conflict("Duplicate key value")),
            AuthError::DuplicateUser
        ));
        assert!(matches!(
            AuthError::from(AppError::service_unavailable("Database unavailable")),
            AuthError::ServiceUnavailable(msg) if msg == "Database unavailable"
        ));
        assert!(matches!(
            AuthError::from(AppError::internal("Database error")),
            AuthError::Storage(_)
        ));
    }

    #[test]
    fn test_sqlx_errors() {
        assert!(matches!(
            AuthError::from(sqlx::Error::PoolTimedOut),
            AuthError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            AuthError::from(sqlx::Error::RowNotFound),
            AuthError::Storage(_)
        ));
    }

    #[test]
    fn test_token_errors_have_distinct_codes() {
        assert_eq!(AuthError::NotAuthenticated.code(), "NOT_AUTHENTICATED");
        assert_eq!(AuthError::InvalidToken.code(), "INVALID_TOKEN");
        assert_eq!(AuthError::UserGone.code(), "USER_GONE");
    }
}
