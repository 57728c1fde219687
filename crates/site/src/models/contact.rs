//! Contact form submissions.

use chrono::{DateTime, Utc};

use nexussphere_core::{ContactId, Email};

/// A stored contact submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub company: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A validated submission ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Email,
    pub company: Option<String>,
    pub message: String,
}
