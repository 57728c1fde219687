//! Authentication extractors.
//!
//! The session holds only the account id. Every extractor reloads the
//! account, so a changed staff flag or a removed account takes effect on the
//! next request.
//!
//! - [`RequireUser`] - HTML pages; anonymous visitors are redirected to login
//! - [`OptionalUser`] - pages that render differently for signed-in users
//! - [`ApiUser`] - JSON API; session or HTTP Basic, otherwise 401

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{Uri, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tower_sessions::Session;

use nexussphere_core::UserId;

use crate::error::{ApiError, AppError, set_sentry_user};
use crate::models::Account;
use crate::models::session::keys;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login page path.
pub const LOGIN_PATH: &str = "/auth/login";

/// Login URL that returns to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    let encoded = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN_PATH}?next={encoded}")
}

/// Load the account whose id is stored in the request's session.
async fn session_account(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<Account>, crate::db::RepositoryError> {
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };

    let user_id: Option<UserId> = session.get(keys::CURRENT_USER_ID).await.ok().flatten();
    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let account = state.users().find_by_id(user_id).await?;
    if let Some(account) = &account {
        set_sentry_user(&account.id, account.username.as_str());
    }
    Ok(account)
}

/// Extractor that requires a signed-in account.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(account): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", account.username)
/// }
/// ```
pub struct RequireUser(pub Account);

/// Rejection for [`RequireUser`].
pub enum AuthRejection {
    /// Redirect to the login page, returning to `next` afterwards.
    RedirectToLogin { next: String },
    /// Loading the account failed.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => Redirect::to(&login_url(&next)).into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account = session_account(parts, state)
            .await
            .map_err(|e| AuthRejection::Failed(e.into()))?;

        // Nested routers see the path without their prefix.
        let uri: &Uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(&parts.uri, |original| &original.0);
        account.map(Self).ok_or_else(|| AuthRejection::RedirectToLogin {
            next: uri
                .path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string),
        })
    }
}

/// Extractor that optionally gets the signed-in account.
///
/// Unlike [`RequireUser`], this never rejects anonymous visitors.
pub struct OptionalUser(pub Option<Account>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(session_account(parts, state).await?))
    }
}

/// Extractor for API requests: the browser session, or HTTP Basic
/// credentials. Anything else is a 401.
pub struct ApiUser(pub Account);

impl FromRequestParts<AppState> for ApiUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(account) = session_account(parts, state).await? {
            return Ok(Self(account));
        }

        let (username, password) =
            basic_credentials(parts).ok_or(ApiError::Unauthenticated)?;

        match AuthService::new(state.users())
            .login(&username, &password)
            .await
        {
            Ok(account) => {
                set_sentry_user(&account.id, account.username.as_str());
                Ok(Self(account))
            }
            Err(AuthError::Repository(e)) => Err(ApiError::Database(e)),
            Err(_) => Err(ApiError::Unauthenticated),
        }
    }
}

/// Decode an `Authorization: Basic ...` header.
fn basic_credentials(parts: &Parts) -> Option<(String, String)> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Store the signed-in account in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user_id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER_ID, user_id).await
}

/// Drop all session data (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_authorization(value: &str) -> Parts {
        let (parts, ()) = Request::get("/api/items")
            .header(AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_login_url_keeps_slashes() {
        assert_eq!(login_url("/items/create"), "/auth/login?next=/items/create");
        assert_eq!(
            login_url("/items?page=2&x=y"),
            "/auth/login?next=/items%3Fpage%3D2%26x%3Dy"
        );
    }

    #[test]
    fn test_basic_credentials() {
        let encoded = STANDARD.encode("alice:s3cret:with-colon");
        let parts = parts_with_authorization(&format!("Basic {encoded}"));
        assert_eq!(
            basic_credentials(&parts),
            Some(("alice".to_string(), "s3cret:with-colon".to_string()))
        );
    }

    #[test]
    fn test_basic_credentials_rejects_other_schemes() {
        let parts = parts_with_authorization("Bearer abc");
        assert_eq!(basic_credentials(&parts), None);

        let parts = parts_with_authorization("Basic !!!");
        assert_eq!(basic_credentials(&parts), None);
    }
}
