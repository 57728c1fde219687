//! Account domain types.

use chrono::{DateTime, Utc};

use nexussphere_core::{Actor, Email, UserId, Username};

/// A site account (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account ID.
    pub id: UserId,
    /// Public display identifier.
    pub username: Username,
    /// Optional contact address.
    pub email: Option<Email>,
    /// Staff accounts may change any item.
    pub is_staff: bool,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// The authorization view of this account.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor::new(self.id, self.is_staff)
    }
}

/// An account about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub email: Option<Email>,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub is_staff: bool,
}
