//! Unified error handling with Sentry integration.
//!
//! Provides two error types that capture server-side failures to Sentry
//! before responding to the client:
//!
//! - [`AppError`] for HTML routes (plain-text bodies)
//! - [`ApiError`] for the JSON API (`{"detail": ...}` bodies, or a
//!   field-to-messages map for validation failures)

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use nexussphere_core::FieldErrors;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::brochure::BrochureError;

/// Application-level error type for HTML routes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Brochure rendering failed.
    #[error("Brochure error: {0}")]
    Brochure(#[from] BrochureError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user is logged in but may not perform this action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_)
            | Self::Session(_)
            | Self::Template(_)
            | Self::Brochure(_)
            | Self::Internal(_) => true,
            Self::Auth(err) => matches!(err, AuthError::Repository(_) | AuthError::PasswordHash),
            Self::NotFound(_) | Self::Forbidden(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            report(&self);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }

        let status = match &self {
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error type for the JSON API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session and no valid Basic credentials.
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    /// Authenticated but not the owner and not staff.
    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Not found.")]
    NotFound,

    /// Field-level validation failure.
    #[error("invalid input: {0}")]
    Validation(FieldErrors),

    /// Malformed request body.
    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::Unauthenticated => {
                let mut response = detail(StatusCode::UNAUTHORIZED, &self.to_string());
                response.headers_mut().insert(
                    WWW_AUTHENTICATE,
                    HeaderValue::from_static(r#"Basic realm="api""#),
                );
                response
            }
            Self::Forbidden => detail(StatusCode::FORBIDDEN, &self.to_string()),
            Self::NotFound => detail(StatusCode::NOT_FOUND, &self.to_string()),
            Self::BadRequest(ref message) => detail(StatusCode::BAD_REQUEST, message),
            Self::Database(_) | Self::Session(_) => {
                report(&self);
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Send a server-side failure to Sentry and the log.
fn report<E: std::error::Error + ?Sized>(err: &E) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "Request error"
    );
}

/// Set the Sentry user context after authentication.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("item 12".to_string());
        assert_eq!(err.to_string(), "Not found: item 12");

        let err = AppError::Forbidden("not your item".to_string());
        assert_eq!(err.to_string(), "Forbidden: not your item");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_api_unauthenticated_has_challenge() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            r#"Basic realm="api""#
        );
        assert_eq!(
            body_json(response).await,
            json!({"detail": "Authentication credentials were not provided."})
        );
    }

    #[tokio::test]
    async fn test_api_validation_body_is_field_map() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        let response = ApiError::Validation(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"name": ["This field is required."]})
        );
    }

    #[tokio::test]
    async fn test_api_server_errors_hide_details() {
        let response = ApiError::Database(RepositoryError::DataCorruption(
            "secret detail".to_string(),
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"detail": "Internal server error"})
        );
    }
}
