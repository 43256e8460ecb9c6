//! Port abstraction for pet persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::pet::{Pet, PetId};
use crate::domain::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by pet repository adapters.
    pub enum PetPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "pet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pet repository query failed: {message}",
        /// Optimistic update lost the race: the stored revision moved on.
        RevisionMismatch { expected: u32 } => "pet revision {expected} is stale",
    }
}

/// Driven port for pet storage.
///
/// `update` is the concurrency-control boundary: the adapter must make the
/// write conditional on the revision carried by the given pet and bump it,
/// so two concurrent actions on the same pet can never interleave — one of
/// them surfaces [`PetPersistenceError::RevisionMismatch`] instead.
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a freshly created pet.
    async fn insert(&self, pet: &Pet) -> Result<(), PetPersistenceError>;

    /// Fetch a pet by identifier.
    async fn find_by_id(&self, id: &PetId) -> Result<Option<Pet>, PetPersistenceError>;

    /// Persist a mutated pet, guarded by its revision. Returns the stored
    /// state with the bumped revision.
    async fn update(&self, pet: &Pet) -> Result<Pet, PetPersistenceError>;

    /// Delete a pet; `false` when it did not exist.
    async fn delete(&self, id: &PetId) -> Result<bool, PetPersistenceError>;

    /// All pets owned by one user, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Pet>, PetPersistenceError>;

    /// Every pet in the system, newest first.
    async fn list_all(&self) -> Result<Vec<Pet>, PetPersistenceError>;

    /// One page of pets, optionally filtered to a single owner.
    async fn list_page(
        &self,
        owner: Option<&UserId>,
        page: &PageRequest,
    ) -> Result<Page<Pet>, PetPersistenceError>;

    /// Delete every pet owned by `owner` (owner-deletion cascade). Returns
    /// the number removed.
    async fn delete_by_owner(&self, owner: &UserId) -> Result<u64, PetPersistenceError>;
}
