//! Password-based authentication service.
//!
//! Implements the [`AuthService`] driving port over the user repository and
//! the password hasher. Registration enforces the uniqueness constraints up
//! front and still maps late constraint collisions to the same conflict
//! errors, so racing duplicate registrations fail cleanly either way.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::auth::{LoginCredentials, Registration};
use crate::domain::pet_service::map_user_repo_error;
use crate::domain::ports::{AuthService, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::user::{Role, User, UserId};
use crate::domain::Error;

/// Authentication service backed by salted password digests.
#[derive(Clone)]
pub struct PasswordAuthService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> PasswordAuthService<U, H> {
    /// Create the service from its collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn map_insert_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already registered"),
        UserPersistenceError::DuplicateUsername { .. } => Error::conflict("username already taken"),
        other => map_user_repo_error(other),
    }
}

#[async_trait]
impl<U, H> AuthService for PasswordAuthService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .users
            .email_exists(registration.email())
            .await
            .map_err(map_user_repo_error)?
        {
            return Err(Error::conflict("email already registered"));
        }
        if self
            .users
            .username_exists(registration.username())
            .await
            .map_err(map_user_repo_error)?
        {
            return Err(Error::conflict("username already taken"));
        }

        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            self.hasher.hash(registration.password()),
            vec![Role::User],
            self.clock.utc(),
        );
        self.users.insert(&user).await.map_err(map_insert_error)?;
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::unauthorized("unknown email address"))?;

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(|err| Error::internal(format!("stored password digest unreadable: {err}")))?;
        if !matches {
            return Err(Error::unauthorized("incorrect password"));
        }
        Ok(user)
    }
}
