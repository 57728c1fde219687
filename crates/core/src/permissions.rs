//! Who may change what.
//!
//! Every mutating request on an owned resource, whether it arrives through an
//! HTML form or the JSON API, is decided by [`can_mutate`]. Reads are never
//! gated.

use crate::types::UserId;

/// The authenticated account performing a request.
///
/// Built fresh from the account store on every request, so a revoked staff
/// flag takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub is_staff: bool,
}

impl Actor {
    #[must_use]
    pub const fn new(id: UserId, is_staff: bool) -> Self {
        Self { id, is_staff }
    }
}

/// A resource with an optional recorded owner.
pub trait Owned {
    fn owner_id(&self) -> Option<UserId>;
}

/// Whether `actor` may update or delete `resource`.
///
/// Staff may mutate anything. Other accounts may mutate only resources they
/// own. Anonymous callers (`None`) may never mutate, and an owner-less
/// resource is staff-only.
#[must_use]
pub fn can_mutate<R: Owned + ?Sized>(actor: Option<&Actor>, resource: &R) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    actor.is_staff || resource.owner_id() == Some(actor.id)
}
