//! Driving port for registration and login use-cases.
//!
//! Inbound adapters call this to establish identity without knowing which
//! repository or hashing scheme backs it, which keeps handler tests
//! deterministic: they substitute a stub instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::auth::{LoginCredentials, Registration};
use crate::domain::user::User;
use crate::domain::Error;

/// Domain use-case port for account registration and authentication.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a new account and return it.
    ///
    /// Duplicate email or username surfaces as a conflict error.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Validate credentials and return the authenticated account.
    ///
    /// Unknown email and wrong password both surface as unauthorized, with
    /// distinct messages.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;
}
