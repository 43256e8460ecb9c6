//! Domain ports and supporting types for the hexagonal boundary.

mod macros;

mod auth_service;
mod fixtures;
mod password_hasher;
mod pet_operations;
mod pet_repository;
mod user_admin;
mod user_repository;

pub use auth_service::AuthService;
pub use fixtures::{InMemoryPetRepository, InMemoryUserRepository};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use pet_operations::{ActionResult, NewPet, PetOperations};
pub use pet_repository::{PetPersistenceError, PetRepository};
pub use user_admin::UserAdministration;
pub use user_repository::{UserPersistenceError, UserRepository};
