//! Domain primitives, aggregates, and the action engine.
//!
//! Purpose: define the strongly typed pet and user models, the pure action
//! engine that evolves a pet, and the ports the transport and persistence
//! adapters plug into. Types stay immutable from the outside; each type's
//! Rustdoc documents its invariants and serde contract.

pub mod access;
pub mod auth;
pub mod error;
pub mod lifecycle;
pub mod pagination;
pub mod password_auth_service;
pub mod pet;
pub mod pet_service;
pub mod ports;
pub mod user;
pub mod user_admin_service;

pub use self::error::{Error, ErrorCode};
pub use self::user::{User, UserId, UserValidationError};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
