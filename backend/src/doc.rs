//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: every HTTP endpoint from the inbound layer, the request and
//! response schemas they reference, and the session-cookie security scheme.
//! Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::error::ErrorCode;
use crate::domain::lifecycle::Warning;
use crate::domain::pagination::{SortDirection, SortField};
use crate::domain::pet::{Breed, LifeStage};
use crate::inbound::http::admin::PetPageResponse;
use crate::inbound::http::auth::{LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::pets::{
    PetActionResponse, PetCreateRequest, PetResponse, PetUpdateRequest,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Virtual pet backend API",
        description = "HTTP interface for account registration, pet care, and administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::pets::create_pet,
        crate::inbound::http::pets::list_pets,
        crate::inbound::http::pets::get_pet,
        crate::inbound::http::pets::update_pet,
        crate::inbound::http::pets::delete_pet,
        crate::inbound::http::pets::feed_pet,
        crate::inbound::http::pets::wash_pet,
        crate::inbound::http::pets::play_with_pet,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::get_user,
        crate::inbound::http::admin::list_user_pets,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::delete_user_pet,
        crate::inbound::http::admin::list_pets,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        PetCreateRequest,
        PetUpdateRequest,
        PetResponse,
        PetActionResponse,
        PetPageResponse,
        Breed,
        LifeStage,
        Warning,
        SortField,
        SortDirection,
    )),
    tags(
        (name = "auth", description = "Registration, login, and logout"),
        (name = "pets", description = "Pet CRUD and care actions"),
        (name = "admin", description = "User and pet administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;

    #[test]
    fn openapi_registers_pet_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/pets"));
        assert!(paths.contains_key("/api/v1/pets/{id}/actions/feed"));
        assert!(paths.contains_key("/api/v1/admin/pets"));
        assert!(paths.contains_key("/api/v1/auth/login"));
    }

    #[test]
    fn openapi_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        assert!(schemas.contains_key("ApiError"));
        assert!(schemas.contains_key("PetResponse"));
    }

    #[test]
    fn security_scheme_names_the_session_cookie() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
