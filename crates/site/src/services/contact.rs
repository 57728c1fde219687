//! Contact form capture.

use serde::Deserialize;
use thiserror::Error;

use nexussphere_core::{Email, EmailError, FieldErrors};

use crate::db::{ContactRepository, RepositoryError};
use crate::models::{Contact, NewContact};

/// Maximum length of the name and company fields.
const MAX_FIELD_LENGTH: usize = 200;

const REQUIRED: &str = "This field is required.";

/// Errors from submitting the contact form.
#[derive(Debug, Error)]
pub enum ContactError {
    /// One or more fields are missing or invalid. Nothing was stored.
    #[error("invalid submission: {0}")]
    Validation(FieldErrors),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Raw contact form input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

impl ContactSubmission {
    /// Check every field and collect all failures.
    ///
    /// # Errors
    ///
    /// Returns the field errors when any field is missing or invalid.
    pub fn validate(&self) -> Result<NewContact, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", REQUIRED);
        } else if name.chars().count() > MAX_FIELD_LENGTH {
            errors.add("name", too_long());
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                errors.add("email", REQUIRED);
                None
            }
            Err(_) => {
                errors.add("email", "Enter a valid email address.");
                None
            }
        };

        let company = self.company.trim();
        if company.chars().count() > MAX_FIELD_LENGTH {
            errors.add("company", too_long());
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.add("message", REQUIRED);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(NewContact {
                name: name.to_owned(),
                email,
                company: (!company.is_empty()).then(|| company.to_owned()),
                message: message.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

fn too_long() -> String {
    format!("Ensure this field has no more than {MAX_FIELD_LENGTH} characters.")
}

/// Validate and store a submission.
///
/// # Errors
///
/// Returns `ContactError::Validation` without storing anything when input is
/// invalid, or `ContactError::Repository` if the insert fails.
pub async fn submit(
    contacts: &dyn ContactRepository,
    submission: &ContactSubmission,
) -> Result<Contact, ContactError> {
    let contact = submission.validate().map_err(ContactError::Validation)?;
    let stored = contacts.create(contact).await?;
    tracing::info!(contact_id = %stored.id, "Contact submission stored");
    Ok(stored)
}
