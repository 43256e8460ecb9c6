//! Driving port for every pet operation the transport layer exposes.

use async_trait::async_trait;

use crate::domain::lifecycle::{PetAction, Warning};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::pet::{Breed, Pet, PetId, PetName};
use crate::domain::{Error, UserId};

/// Validated payload for pet creation.
#[derive(Debug, Clone)]
pub struct NewPet {
    /// Display name.
    pub name: PetName,
    /// Breed, immutable afterwards.
    pub breed: Breed,
}

/// Result of a care action: the persisted pet plus advisories.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    /// The pet as stored after the action.
    pub pet: Pet,
    /// Advisory tags; empty when the pet just died.
    pub warnings: Vec<Warning>,
    /// Death notice, present only when this action killed the pet.
    pub death_notice: Option<&'static str>,
}

/// Domain use-case port covering the pet surface.
///
/// Every method resolves the caller and passes the access gate before
/// touching the target pet; `caller` is the session subject, not a trusted
/// user record.
#[async_trait]
pub trait PetOperations: Send + Sync {
    /// Create a pet owned by the caller, with spawn-default stats.
    async fn create_pet(&self, caller: &UserId, new_pet: NewPet) -> Result<Pet, Error>;

    /// Fetch one pet (owner or admin).
    async fn get_pet(&self, caller: &UserId, pet: &PetId) -> Result<Pet, Error>;

    /// List pets: admins see every pet, everyone else their own.
    async fn list_pets(&self, caller: &UserId) -> Result<Vec<Pet>, Error>;

    /// Admin-only paginated listing with an optional owner filter.
    async fn list_pets_page(
        &self,
        caller: &UserId,
        owner: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<Pet>, Error>;

    /// Rename a pet (owner or admin). The only mutable field besides stats.
    async fn rename_pet(&self, caller: &UserId, pet: &PetId, name: PetName) -> Result<Pet, Error>;

    /// Delete a pet (owner or admin).
    async fn delete_pet(&self, caller: &UserId, pet: &PetId) -> Result<(), Error>;

    /// Apply one care action atomically and persist the outcome.
    async fn perform_action(
        &self,
        caller: &UserId,
        pet: &PetId,
        action: PetAction,
    ) -> Result<ActionResult, Error>;
}
