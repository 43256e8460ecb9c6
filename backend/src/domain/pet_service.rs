//! Pet domain service.
//!
//! Implements the [`PetOperations`] driving port on top of the repository
//! ports, the access gate, and the pure action engine. Every entry point
//! resolves the caller, then gates access before touching the target pet.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::access::{authorize, require_admin};
use crate::domain::lifecycle::{apply_action, ActionEffects, ActionRejection, PetAction};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::pet::{Pet, PetId, PetName};
use crate::domain::ports::{
    ActionResult, NewPet, PetOperations, PetPersistenceError, PetRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::user::{User, UserId};
use crate::domain::Error;

pub(crate) fn map_pet_repo_error(error: PetPersistenceError) -> Error {
    match error {
        PetPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("pet repository unavailable: {message}"))
        }
        PetPersistenceError::Query { message } => {
            Error::internal(format!("pet repository error: {message}"))
        }
        PetPersistenceError::RevisionMismatch { .. } => {
            Error::conflict("pet was modified concurrently; retry the action")
        }
    }
}

pub(crate) fn map_user_repo_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

fn map_rejection(rejection: ActionRejection) -> Error {
    let error = match rejection {
        ActionRejection::PetDeceased => Error::gone(rejection.to_string()),
        ActionRejection::PetNotHungry
        | ActionRejection::PetAlreadyClean
        | ActionRejection::PetTooHappy => Error::conflict(rejection.to_string()),
    };
    error.with_details(json!({ "reason": rejection.as_str() }))
}

/// Pet service wiring the repositories, clock, and effect table together.
#[derive(Clone)]
pub struct PetService<P, U> {
    pets: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    effects: ActionEffects,
}

impl<P, U> PetService<P, U> {
    /// Create a service with the canonical effect table.
    pub fn new(pets: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self::with_effects(pets, users, clock, ActionEffects::default())
    }

    /// Create a service with a custom effect table.
    pub fn with_effects(
        pets: Arc<P>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        effects: ActionEffects,
    ) -> Self {
        Self {
            pets,
            users,
            clock,
            effects,
        }
    }
}

impl<P, U> PetService<P, U>
where
    P: PetRepository,
    U: UserRepository,
{
    /// Resolve the session subject to a live account.
    ///
    /// A session naming a deleted account is no longer authenticated, so an
    /// unknown id surfaces as `Unauthorized` rather than `NotFound`.
    async fn resolve_caller(&self, caller: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(caller)
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }

    async fn load_pet(&self, id: &PetId) -> Result<Pet, Error> {
        self.pets
            .find_by_id(id)
            .await
            .map_err(map_pet_repo_error)?
            .ok_or_else(|| Error::not_found(format!("pet {id} not found")))
    }

    /// Load the pet and pass the caller through the access gate.
    async fn load_authorized(&self, caller: &UserId, id: &PetId) -> Result<Pet, Error> {
        let caller = self.resolve_caller(caller).await?;
        let pet = self.load_pet(id).await?;
        authorize(&caller, &pet)?;
        Ok(pet)
    }
}

#[async_trait]
impl<P, U> PetOperations for PetService<P, U>
where
    P: PetRepository,
    U: UserRepository,
{
    async fn create_pet(&self, caller: &UserId, new_pet: NewPet) -> Result<Pet, Error> {
        let owner = self.resolve_caller(caller).await?;
        let pet = Pet::new(
            PetId::random(),
            new_pet.name,
            new_pet.breed,
            *owner.id(),
            self.clock.utc(),
        );
        self.pets.insert(&pet).await.map_err(map_pet_repo_error)?;
        Ok(pet)
    }

    async fn get_pet(&self, caller: &UserId, pet: &PetId) -> Result<Pet, Error> {
        self.load_authorized(caller, pet).await
    }

    async fn list_pets(&self, caller: &UserId) -> Result<Vec<Pet>, Error> {
        let caller = self.resolve_caller(caller).await?;
        let pets = if caller.is_admin() {
            self.pets.list_all().await
        } else {
            self.pets.list_by_owner(caller.id()).await
        };
        pets.map_err(map_pet_repo_error)
    }

    async fn list_pets_page(
        &self,
        caller: &UserId,
        owner: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<Pet>, Error> {
        let caller = self.resolve_caller(caller).await?;
        require_admin(&caller)?;
        self.pets
            .list_page(owner.as_ref(), &page)
            .await
            .map_err(map_pet_repo_error)
    }

    async fn rename_pet(&self, caller: &UserId, pet: &PetId, name: PetName) -> Result<Pet, Error> {
        let mut pet = self.load_authorized(caller, pet).await?;
        pet.rename(name);
        self.pets.update(&pet).await.map_err(map_pet_repo_error)
    }

    async fn delete_pet(&self, caller: &UserId, pet: &PetId) -> Result<(), Error> {
        let pet = self.load_authorized(caller, pet).await?;
        let removed = self
            .pets
            .delete(pet.id())
            .await
            .map_err(map_pet_repo_error)?;
        if !removed {
            return Err(Error::not_found(format!("pet {} not found", pet.id())));
        }
        Ok(())
    }

    async fn perform_action(
        &self,
        caller: &UserId,
        pet: &PetId,
        action: PetAction,
    ) -> Result<ActionResult, Error> {
        let pet = self.load_authorized(caller, pet).await?;
        let outcome =
            apply_action(&pet, action, &self.effects, self.clock.utc()).map_err(map_rejection)?;
        let stored = self
            .pets
            .update(&outcome.pet)
            .await
            .map_err(map_pet_repo_error)?;
        Ok(ActionResult {
            death_notice: outcome.death_notice(),
            warnings: outcome.warnings,
            pet: stored,
        })
    }
}
