//! Authentication route handlers.
//!
//! Username and password sign-in against local accounts. The session only
//! stores the account id; see [`crate::middleware::auth`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use nexussphere_core::FieldErrors;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::routes::PageContext;
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

/// Where a login without a usable `next` lands.
const DEFAULT_LOGIN_REDIRECT: &str = "/items";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: String,
}

/// Signup form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub next: Option<String>,
    pub registered: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub error: Option<&'static str>,
    pub registered: bool,
    pub next: String,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub page: PageContext,
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

/// `next` if it is a path on this site, so login cannot bounce visitors
/// to another host.
fn local_redirect(next: &str) -> Option<&str> {
    let next = next.trim();
    (next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')).then_some(next)
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "credentials" => Some(
            "Please enter a correct username and password. Note that both fields may be case-sensitive.",
        ),
        "session" => Some("Your session could not be started. Please try again."),
        _ => None,
    }
}

fn login_error_url(code: &str, next: &str) -> String {
    local_redirect(next).map_or_else(
        || format!("{LOGIN_PATH}?error={code}"),
        |next| format!("{LOGIN_PATH}?error={code}&next={}", urlencoding::encode(next)),
    )
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        page: PageContext::new(&state, user.as_ref()),
        error: query.error.as_deref().and_then(error_message),
        registered: query.registered.is_some(),
        next: query
            .next
            .as_deref()
            .and_then(local_redirect)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns an error if the account store cannot be reached.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let account = match AuthService::new(state.users())
        .login(&form.username, &form.password)
        .await
    {
        Ok(account) => account,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "Login failed");
            return Ok(Redirect::to(&login_error_url("credentials", &form.next)).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = set_current_user(&session, account.id).await {
        tracing::error!("Failed to set session: {}", e);
        return Ok(Redirect::to(&login_error_url("session", &form.next)).into_response());
    }
    set_sentry_user(&account.id, account.username.as_str());
    tracing::info!(user_id = %account.id, "Logged in");

    let target = local_redirect(&form.next).unwrap_or(DEFAULT_LOGIN_REDIRECT);
    Ok(Redirect::to(target).into_response())
}

/// Handle logout.
///
/// # Errors
///
/// Returns an error if the session cannot be cleared.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    SignupTemplate {
        page: PageContext::new(&state, user.as_ref()),
        username: String::new(),
        email: String::new(),
        errors: FieldErrors::new(),
    }
}

/// Handle signup form submission.
///
/// Success redirects to the login page; invalid input re-renders the form
/// with field errors.
///
/// # Errors
///
/// Returns an error if the account store cannot be reached or hashing fails.
pub async fn signup(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let result = if form.password1 == form.password2 {
        AuthService::new(state.users())
            .register(Registration {
                username: &form.username,
                email: Some(&form.email),
                password: &form.password1,
                is_staff: false,
            })
            .await
    } else {
        Err(AuthError::PasswordMismatch)
    };

    let mut errors = FieldErrors::new();
    match result {
        Ok(_) => return Ok(Redirect::to(&format!("{LOGIN_PATH}?registered=1")).into_response()),
        Err(AuthError::InvalidUsername(e)) => errors.add("username", e.to_string()),
        Err(AuthError::UserAlreadyExists) => {
            errors.add("username", "A user with that username already exists.");
        }
        Err(AuthError::InvalidEmail(_)) => errors.add("email", "Enter a valid email address."),
        Err(AuthError::PasswordMismatch) => {
            errors.add("password2", "The two password fields didn't match.");
        }
        Err(AuthError::WeakPassword(reason)) => errors.add("password2", reason),
        Err(e) => return Err(AppError::Auth(e)),
    }

    Ok(SignupTemplate {
        page: PageContext::new(&state, user.as_ref()),
        username: form.username,
        email: form.email,
        errors,
    }
    .into_response())
}

/// Create the auth routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_redirect_accepts_site_paths() {
        assert_eq!(local_redirect("/items/3/edit"), Some("/items/3/edit"));
        assert_eq!(local_redirect("/items?page=2"), Some("/items?page=2"));
    }

    #[test]
    fn test_local_redirect_rejects_other_hosts() {
        assert_eq!(local_redirect("https://evil.example"), None);
        assert_eq!(local_redirect("//evil.example"), None);
        assert_eq!(local_redirect("/\\evil.example"), None);
        assert_eq!(local_redirect(""), None);
    }

    #[test]
    fn test_login_error_url_keeps_next() {
        assert_eq!(
            login_error_url("credentials", "/items/create"),
            "/auth/login?error=credentials&next=%2Fitems%2Fcreate"
        );
        assert_eq!(
            login_error_url("credentials", "//evil"),
            "/auth/login?error=credentials"
        );
    }
}
