//! Contact form route handlers.
//!
//! Submissions are stored for staff to follow up; nothing is sent out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use nexussphere_core::FieldErrors;

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::routes::PageContext;
use crate::services::contact::{self, ContactError, ContactSubmission};
use crate::state::AppState;

/// Shown above the form when a submission is rejected.
const ERROR_SUMMARY: &str = "Please fill in all required fields.";

/// Query parameters for the contact page.
#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub sent: Option<String>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactSubmission,
    pub errors: FieldErrors,
    pub error_summary: Option<&'static str>,
    pub sent: bool,
    pub contact_email: String,
    pub contact_phone: String,
}

impl ContactTemplate {
    fn new(state: &AppState, page: PageContext) -> Self {
        let identity = &state.config().identity;
        Self {
            page,
            form: ContactSubmission::default(),
            errors: FieldErrors::new(),
            error_summary: None,
            sent: false,
            contact_email: identity.contact_email.clone(),
            contact_phone: identity.contact_phone.clone(),
        }
    }
}

/// Display the contact form.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ContactQuery>,
) -> impl IntoResponse {
    let mut template = ContactTemplate::new(&state, PageContext::new(&state, user.as_ref()));
    template.sent = query.sent.is_some();
    template
}

/// Store a contact submission.
///
/// A valid submission redirects back to the form with a confirmation. An
/// invalid one re-renders the form with the entered values and field errors,
/// and nothing is stored.
///
/// # Errors
///
/// Returns an error if the submission cannot be stored.
#[instrument(skip(state, user, form))]
pub async fn submit(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Form(form): Form<ContactSubmission>,
) -> Result<Response> {
    match contact::submit(state.contacts(), &form).await {
        Ok(_) => Ok(Redirect::to("/contact?sent=1").into_response()),
        Err(ContactError::Validation(errors)) => {
            let mut template =
                ContactTemplate::new(&state, PageContext::new(&state, user.as_ref()));
            template.form = form;
            template.errors = errors;
            template.error_summary = Some(ERROR_SUMMARY);
            Ok(template.into_response())
        }
        Err(ContactError::Repository(e)) => Err(AppError::Database(e)),
    }
}
