//! Port abstraction for credential hashing adapters.

use crate::domain::user::PasswordHash;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The stored digest could not be parsed.
        MalformedDigest { message: String } => "stored digest is malformed: {message}",
    }
}

/// Driven port for hashing and verifying passwords.
///
/// Hashing is CPU-bound and synchronous; services call it before or after
/// their async persistence work.
pub trait PasswordHasher: Send + Sync {
    /// Derive a storable digest from a raw password.
    fn hash(&self, password: &str) -> PasswordHash;

    /// Check a raw password against a stored digest.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
