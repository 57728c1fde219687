//! Static company page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use tracing::instrument;

use crate::middleware::OptionalUser;
use crate::routes::PageContext;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

/// Privacy policy template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/privacy.html")]
pub struct PrivacyTemplate {
    pub page: PageContext,
    pub contact_email: String,
}

/// Terms of service template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/terms.html")]
pub struct TermsTemplate {
    pub page: PageContext,
    pub contact_email: String,
}

/// Display the About page.
#[instrument(skip(state, user))]
pub async fn about(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    AboutTemplate {
        page: PageContext::new(&state, user.as_ref()),
    }
}

/// Display the Privacy Policy page.
#[instrument(skip(state, user))]
pub async fn privacy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    PrivacyTemplate {
        page: PageContext::new(&state, user.as_ref()),
        contact_email: state.config().identity.contact_email.clone(),
    }
}

/// Display the Terms of Service page.
#[instrument(skip(state, user))]
pub async fn terms(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    TermsTemplate {
        page: PageContext::new(&state, user.as_ref()),
        contact_email: state.config().identity.contact_email.clone(),
    }
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/privacy", get(privacy))
        .route("/terms", get(terms))
}
