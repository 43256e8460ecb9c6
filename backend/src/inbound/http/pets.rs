//! Pet API handlers.
//!
//! ```text
//! POST   /api/v1/pets                 create a pet
//! GET    /api/v1/pets                 list pets (own, or all for admins)
//! GET    /api/v1/pets/{id}            fetch one pet
//! PUT    /api/v1/pets/{id}            rename a pet
//! DELETE /api/v1/pets/{id}            delete a pet
//! POST   /api/v1/pets/{id}/actions/feed | wash | play
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::lifecycle::{PetAction, Warning};
use crate::domain::pet::{Breed, LifeStage, Pet, PetId, PetName, PetValidationError};
use crate::domain::ports::{ActionResult, NewPet};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Pet creation request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetCreateRequest {
    /// Display name, 1 to 30 characters after trimming.
    pub name: String,
    /// Breed tag; immutable afterwards.
    pub breed: Breed,
}

/// Pet rename request body. Name is the only mutable field.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetUpdateRequest {
    /// New display name.
    pub name: String,
}

/// Public view of a pet.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Fixed breed tag.
    pub breed: Breed,
    /// Current life stage.
    pub life_stage: LifeStage,
    /// Hunger in `[0, 100]`; 100 is starvation.
    pub hunger: u8,
    /// Hygiene in `[0, 100]`; 0 is filthy.
    pub hygiene: u8,
    /// Fun in `[0, 100]`; 0 is miserable.
    pub fun: u8,
    /// Actions applied over the pet's lifetime.
    pub action_count: u32,
    /// Whether the pet has died.
    pub dead: bool,
    /// When the pet died, if it has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owning user id.
    pub owner_id: Uuid,
}

impl From<&Pet> for PetResponse {
    fn from(pet: &Pet) -> Self {
        let stats = pet.stats();
        Self {
            id: *pet.id().as_uuid(),
            name: pet.name().to_string(),
            breed: pet.breed(),
            life_stage: pet.life_stage(),
            hunger: stats.hunger.value(),
            hygiene: stats.hygiene.value(),
            fun: stats.fun.value(),
            action_count: pet.action_count(),
            dead: pet.is_dead(),
            death_at: pet.death_at(),
            created_at: pet.created_at(),
            owner_id: *pet.owner().as_uuid(),
        }
    }
}

/// Response returned after a care action: the pet plus advisories.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetActionResponse {
    /// The pet after the action.
    #[serde(flatten)]
    pub pet: PetResponse,
    /// Advisory tags; omitted when none apply.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<Warning>,
    /// Death notice, present only when this action killed the pet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&ActionResult> for PetActionResponse {
    fn from(result: &ActionResult) -> Self {
        Self {
            pet: PetResponse::from(&result.pet),
            warnings: result.warnings.clone(),
            message: result.death_notice.map(str::to_owned),
        }
    }
}

fn map_name_error(err: PetValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
}

fn parse_pet_id(raw: &str) -> Result<PetId, Error> {
    raw.parse::<Uuid>()
        .map(PetId::from)
        .map_err(|_| Error::invalid_request("pet id must be a UUID"))
}

/// Create a pet owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/pets",
    request_body = PetCreateRequest,
    responses(
        (status = 201, description = "Pet created", body = PetResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::error::ApiError),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "createPet"
)]
#[post("/pets")]
pub async fn create_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PetCreateRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let payload = payload.into_inner();
    let name = PetName::new(&payload.name).map_err(map_name_error)?;
    let pet = state
        .pets
        .create_pet(
            &caller,
            NewPet {
                name,
                breed: payload.breed,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(PetResponse::from(&pet)))
}

/// List pets visible to the caller: admins see every pet, everyone else
/// their own.
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    responses(
        (status = 200, description = "Pets", body = [PetResponse]),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "listPets"
)]
#[get("/pets")]
pub async fn list_pets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PetResponse>>> {
    let caller = session.require_user_id()?;
    let pets = state.pets.list_pets(&caller).await?;
    Ok(web::Json(pets.iter().map(PetResponse::from).collect()))
}

/// Fetch one pet.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}",
    params(("id" = Uuid, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet", body = PetResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Not your pet", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such pet", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "getPet"
)]
#[get("/pets/{id}")]
pub async fn get_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PetResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_pet_id(&path)?;
    let pet = state.pets.get_pet(&caller, &id).await?;
    Ok(web::Json(PetResponse::from(&pet)))
}

/// Rename a pet.
#[utoipa::path(
    put,
    path = "/api/v1/pets/{id}",
    params(("id" = Uuid, Path, description = "Pet identifier")),
    request_body = PetUpdateRequest,
    responses(
        (status = 200, description = "Pet renamed", body = PetResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::error::ApiError),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Not your pet", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such pet", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Concurrent modification", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "updatePet"
)]
#[put("/pets/{id}")]
pub async fn update_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PetUpdateRequest>,
) -> ApiResult<web::Json<PetResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_pet_id(&path)?;
    let name = PetName::new(&payload.name).map_err(map_name_error)?;
    let pet = state.pets.rename_pet(&caller, &id, name).await?;
    Ok(web::Json(PetResponse::from(&pet)))
}

/// Delete a pet.
#[utoipa::path(
    delete,
    path = "/api/v1/pets/{id}",
    params(("id" = Uuid, Path, description = "Pet identifier")),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Not your pet", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such pet", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "deletePet"
)]
#[delete("/pets/{id}")]
pub async fn delete_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let id = parse_pet_id(&path)?;
    state.pets.delete_pet(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn run_action(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    action: PetAction,
) -> ApiResult<web::Json<PetActionResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_pet_id(raw_id)?;
    let result = state.pets.perform_action(&caller, &id, action).await?;
    Ok(web::Json(PetActionResponse::from(&result)))
}

/// Feed the pet.
#[utoipa::path(
    post,
    path = "/api/v1/pets/{id}/actions/feed",
    params(("id" = Uuid, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Action applied", body = PetActionResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Not your pet", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such pet", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Pet is not hungry", body = crate::inbound::http::error::ApiError),
        (status = 410, description = "Pet has passed away", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "feedPet"
)]
#[post("/pets/{id}/actions/feed")]
pub async fn feed_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PetActionResponse>> {
    run_action(&state, &session, &path, PetAction::Feed).await
}

/// Wash the pet.
#[utoipa::path(
    post,
    path = "/api/v1/pets/{id}/actions/wash",
    params(("id" = Uuid, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Action applied", body = PetActionResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Not your pet", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such pet", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Pet is already clean", body = crate::inbound::http::error::ApiError),
        (status = 410, description = "Pet has passed away", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "washPet"
)]
#[post("/pets/{id}/actions/wash")]
pub async fn wash_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PetActionResponse>> {
    run_action(&state, &session, &path, PetAction::Wash).await
}

/// Play with the pet.
#[utoipa::path(
    post,
    path = "/api/v1/pets/{id}/actions/play",
    params(("id" = Uuid, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Action applied", body = PetActionResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Not your pet", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such pet", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Pet is too happy", body = crate::inbound::http::error::ApiError),
        (status = 410, description = "Pet has passed away", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["pets"],
    operation_id = "playWithPet"
)]
#[post("/pets/{id}/actions/play")]
pub async fn play_with_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PetActionResponse>> {
    run_action(&state, &session, &path, PetAction::Play).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_session, test_app};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    async fn create_rex(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &Cookie<'static>,
    ) -> Value {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/pets")
                .cookie(cookie.clone())
                .set_json(PetCreateRequest {
                    name: "Rex".into(),
                    breed: Breed::Labrador,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        actix_test::read_body_json(res).await
    }

    #[actix_web::test]
    async fn create_returns_spawn_defaults() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_session(&app, "ada").await;

        let pet = create_rex(&app, &cookie).await;
        assert_eq!(pet["name"], "Rex");
        assert_eq!(pet["breed"], "LABRADOR");
        assert_eq!(pet["lifeStage"], "BABY");
        assert_eq!(pet["hunger"], 50);
        assert_eq!(pet["hygiene"], 70);
        assert_eq!(pet["fun"], 60);
        assert_eq!(pet["actionCount"], 0);
        assert_eq!(pet["dead"], false);
        assert!(pet.get("deathAt").is_none());
    }

    #[actix_web::test]
    async fn requires_login() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/pets").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn strangers_cannot_see_each_others_pets() {
        let app = actix_test::init_service(test_app()).await;
        let ada = login_session(&app, "ada").await;
        let bob = login_session(&app, "bob").await;

        let pet = create_rex(&app, &ada).await;
        let id = pet["id"].as_str().expect("pet id");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/pets/{id}"))
                .cookie(bob.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // Listing stays scoped per caller.
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/pets")
                .cookie(bob)
                .to_request(),
        )
        .await;
        let list: Value = actix_test::read_body_json(res).await;
        assert_eq!(list.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn feed_then_feed_again_conflicts() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_session(&app, "ada").await;
        let pet = create_rex(&app, &cookie).await;
        let id = pet["id"].as_str().expect("pet id");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/pets/{id}/actions/feed"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["hunger"], 0);
        assert_eq!(body["actionCount"], 1);
        assert!(body.get("message").is_none());

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/pets/{id}/actions/feed"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["reason"], "pet_not_hungry");
    }

    #[actix_web::test]
    async fn rename_and_delete_round_trip() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_session(&app, "ada").await;
        let pet = create_rex(&app, &cookie).await;
        let id = pet["id"].as_str().expect("pet id");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/pets/{id}"))
                .cookie(cookie.clone())
                .set_json(PetUpdateRequest { name: "Max".into() })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["name"], "Max");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/pets/{id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/pets/{id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_pet_id_is_invalid_request() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_session(&app, "ada").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/pets/not-a-uuid")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn overlong_name_is_rejected() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_session(&app, "ada").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/pets")
                .cookie(cookie)
                .set_json(PetCreateRequest {
                    name: "x".repeat(31),
                    breed: Breed::Dalmatian,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "name");
    }
}
