//! Driving port for the admin user-management surface.

use async_trait::async_trait;

use crate::domain::pet::{Pet, PetId};
use crate::domain::user::{User, UserId};
use crate::domain::Error;

/// Admin-only operations over user accounts and their pets.
///
/// Every method re-checks the caller's admin role; the transport layer does
/// not gate these routes itself.
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// List every registered user.
    async fn list_users(&self, caller: &UserId) -> Result<Vec<User>, Error>;

    /// Fetch one user account.
    async fn get_user(&self, caller: &UserId, user: &UserId) -> Result<User, Error>;

    /// List the pets owned by one user.
    async fn list_user_pets(&self, caller: &UserId, user: &UserId) -> Result<Vec<Pet>, Error>;

    /// Delete a user account together with every pet it owns.
    async fn delete_user(&self, caller: &UserId, user: &UserId) -> Result<(), Error>;

    /// Delete one pet belonging to a specific user.
    async fn delete_user_pet(
        &self,
        caller: &UserId,
        user: &UserId,
        pet: &PetId,
    ) -> Result<(), Error>;
}
