//! Admin user-management service.
//!
//! Implements the [`UserAdministration`] driving port. Every entry point
//! resolves the caller and requires the admin role before acting on the
//! target account.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access::require_admin;
use crate::domain::pet::{Pet, PetId};
use crate::domain::pet_service::{map_pet_repo_error, map_user_repo_error};
use crate::domain::ports::{PetRepository, UserAdministration, UserRepository};
use crate::domain::user::{User, UserId};
use crate::domain::Error;

/// Admin service combining the user and pet repositories.
#[derive(Clone)]
pub struct UserAdminService<U, P> {
    users: Arc<U>,
    pets: Arc<P>,
}

impl<U, P> UserAdminService<U, P> {
    /// Create the service from its repositories.
    pub fn new(users: Arc<U>, pets: Arc<P>) -> Self {
        Self { users, pets }
    }
}

impl<U, P> UserAdminService<U, P>
where
    U: UserRepository,
    P: PetRepository,
{
    async fn resolve_admin(&self, caller: &UserId) -> Result<User, Error> {
        let caller = self
            .users
            .find_by_id(caller)
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        require_admin(&caller)?;
        Ok(caller)
    }

    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[async_trait]
impl<U, P> UserAdministration for UserAdminService<U, P>
where
    U: UserRepository,
    P: PetRepository,
{
    async fn list_users(&self, caller: &UserId) -> Result<Vec<User>, Error> {
        self.resolve_admin(caller).await?;
        self.users.list().await.map_err(map_user_repo_error)
    }

    async fn get_user(&self, caller: &UserId, user: &UserId) -> Result<User, Error> {
        self.resolve_admin(caller).await?;
        self.load_user(user).await
    }

    async fn list_user_pets(&self, caller: &UserId, user: &UserId) -> Result<Vec<Pet>, Error> {
        self.resolve_admin(caller).await?;
        let user = self.load_user(user).await?;
        self.pets
            .list_by_owner(user.id())
            .await
            .map_err(map_pet_repo_error)
    }

    async fn delete_user(&self, caller: &UserId, user: &UserId) -> Result<(), Error> {
        self.resolve_admin(caller).await?;
        let user = self.load_user(user).await?;
        // Pets first, so a failure part-way never leaves orphaned pets
        // pointing at a deleted owner.
        self.pets
            .delete_by_owner(user.id())
            .await
            .map_err(map_pet_repo_error)?;
        let removed = self
            .users
            .delete(user.id())
            .await
            .map_err(map_user_repo_error)?;
        if !removed {
            return Err(Error::not_found(format!("user {} not found", user.id())));
        }
        Ok(())
    }

    async fn delete_user_pet(
        &self,
        caller: &UserId,
        user: &UserId,
        pet: &PetId,
    ) -> Result<(), Error> {
        self.resolve_admin(caller).await?;
        let user = self.load_user(user).await?;
        let pet = self
            .pets
            .find_by_id(pet)
            .await
            .map_err(map_pet_repo_error)?
            .ok_or_else(|| Error::not_found(format!("pet {pet} not found")))?;
        if pet.owner() != user.id() {
            return Err(Error::forbidden("pet does not belong to this user"));
        }
        self.pets
            .delete(pet.id())
            .await
            .map_err(map_pet_repo_error)?;
        Ok(())
    }
}
