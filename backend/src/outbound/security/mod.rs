//! Security adapters for the driven side of the application.

pub mod sha_password_hasher;

pub use sha_password_hasher::ShaPasswordHasher;
