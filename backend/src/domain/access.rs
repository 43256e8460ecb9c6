//! The access gate: one authorisation policy reused by every pet operation.

use crate::domain::pet::Pet;
use crate::domain::user::User;
use crate::domain::{Error, ErrorCode};

/// Authorise `caller` to act on `pet`.
///
/// Admins may act on any pet; everyone else only on their own. All pet
/// operations, read or write, funnel through this single check so the
/// owner/admin branching lives in exactly one place.
pub fn authorize(caller: &User, pet: &Pet) -> Result<(), Error> {
    if caller.is_admin() || pet.owner() == caller.id() {
        Ok(())
    } else {
        Err(Error::forbidden("access denied: not your pet"))
    }
}

/// Require the admin role for administrative surfaces.
pub fn require_admin(caller: &User) -> Result<(), Error> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("admin only"))
    }
}
