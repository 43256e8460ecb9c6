//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, User, UserId, Username};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Insert collided with the unique email constraint.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// Insert collided with the unique username constraint.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

/// Driven port for user storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; uniqueness collisions surface as duplicate errors.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by login key.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Does any account hold this email?
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError>;

    /// Does any account hold this username?
    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    /// All accounts, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Delete an account; `false` when it did not exist. Pets owned by the
    /// account are cascade-deleted by the pet repository first.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
