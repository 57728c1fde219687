//! Session-related types.
//!
//! Only the account id is stored in the session. The account itself, and in
//! particular its staff flag, is reloaded from the database on every request.

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the logged-in account's id.
    pub const CURRENT_USER_ID: &str = "current_user_id";
}
