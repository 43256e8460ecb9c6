//! In-memory repository implementations.
//!
//! These back the repository ports with plain `Mutex<HashMap>` storage so the
//! server can run without a database pool and so tests can exercise the full
//! service stack deterministically.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::pagination::{Page, PageRequest, SortDirection, SortField};
use crate::domain::pet::{Pet, PetId};
use crate::domain::ports::pet_repository::{PetPersistenceError, PetRepository};
use crate::domain::ports::user_repository::{UserPersistenceError, UserRepository};
use crate::domain::user::{EmailAddress, User, UserId, Username};

/// In-memory user store keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user synchronously, bypassing duplicate checks.
    ///
    /// Intended for bootstrap seeding before the store is shared.
    ///
    /// # Panics
    /// Panics if the store mutex is poisoned.
    pub fn seed(&self, user: User) {
        self.store
            .lock()
            .expect("user store poisoned")
            .insert(*user.id(), user);
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.store
            .lock()
            .map_err(|_| UserPersistenceError::connection("user store poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut store = self.lock()?;
        if store.values().any(|u| u.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        if store.values().any(|u| u.username() == user.username()) {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        store.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.values().find(|u| u.email() == email).cloned())
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.values().any(|u| u.email() == email))
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.values().any(|u| u.username() == username))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = self.lock()?.values().cloned().collect();
        users.sort_by_key(User::created_at);
        Ok(users)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.remove(id).is_some())
    }
}

/// In-memory pet store keyed by pet id, with revision-guarded updates.
#[derive(Debug, Default)]
pub struct InMemoryPetRepository {
    store: Mutex<HashMap<PetId, Pet>>,
}

impl InMemoryPetRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PetId, Pet>>, PetPersistenceError> {
        self.store
            .lock()
            .map_err(|_| PetPersistenceError::connection("pet store poisoned"))
    }
}

fn sort_pets(pets: &mut [Pet], field: SortField, direction: SortDirection) {
    pets.sort_by(|a, b| {
        let ordering = match field {
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortField::Name => a.name().as_ref().cmp(b.name().as_ref()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn insert(&self, pet: &Pet) -> Result<(), PetPersistenceError> {
        self.lock()?.insert(*pet.id(), pet.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PetId) -> Result<Option<Pet>, PetPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn update(&self, pet: &Pet) -> Result<Pet, PetPersistenceError> {
        let mut store = self.lock()?;
        let Some(current) = store.get(pet.id()) else {
            return Err(PetPersistenceError::query("pet vanished during update"));
        };
        if current.revision() != pet.revision() {
            return Err(PetPersistenceError::RevisionMismatch {
                expected: current.revision(),
            });
        }
        let stored = pet.clone().with_bumped_revision();
        store.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &PetId) -> Result<bool, PetPersistenceError> {
        Ok(self.lock()?.remove(id).is_some())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Pet>, PetPersistenceError> {
        let mut pets: Vec<Pet> = self
            .lock()?
            .values()
            .filter(|p| p.owner() == owner)
            .cloned()
            .collect();
        sort_pets(&mut pets, SortField::CreatedAt, SortDirection::Desc);
        Ok(pets)
    }

    async fn list_all(&self) -> Result<Vec<Pet>, PetPersistenceError> {
        let mut pets: Vec<Pet> = self.lock()?.values().cloned().collect();
        sort_pets(&mut pets, SortField::CreatedAt, SortDirection::Desc);
        Ok(pets)
    }

    async fn list_page(
        &self,
        owner: Option<&UserId>,
        page: &PageRequest,
    ) -> Result<Page<Pet>, PetPersistenceError> {
        let mut pets: Vec<Pet> = self
            .lock()?
            .values()
            .filter(|p| owner.is_none_or(|o| p.owner() == o))
            .cloned()
            .collect();
        sort_pets(&mut pets, page.sort(), page.direction());
        let total = pets.len() as u64;
        let items: Vec<Pet> = pets
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size()).unwrap_or(usize::MAX))
            .collect();
        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total,
        })
    }

    async fn delete_by_owner(&self, owner: &UserId) -> Result<u64, PetPersistenceError> {
        let mut store = self.lock()?;
        let doomed: Vec<PetId> = store
            .values()
            .filter(|p| p.owner() == owner)
            .map(|p| *p.id())
            .collect();
        let removed = doomed.len() as u64;
        for id in &doomed {
            store.remove(id);
        }
        Ok(removed)
    }
}
