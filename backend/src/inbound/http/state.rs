//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, PetOperations, UserAdministration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login use-cases.
    pub auth: Arc<dyn AuthService>,
    /// Pet CRUD and care actions.
    pub pets: Arc<dyn PetOperations>,
    /// Admin user-management use-cases.
    pub admin_users: Arc<dyn UserAdministration>,
}

impl HttpState {
    /// Bundle the port implementations for the HTTP layer.
    pub fn new(
        auth: Arc<dyn AuthService>,
        pets: Arc<dyn PetOperations>,
        admin_users: Arc<dyn UserAdministration>,
    ) -> Self {
        Self {
            auth,
            pets,
            admin_users,
        }
    }
}
