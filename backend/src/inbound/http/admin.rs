//! Admin API handlers.
//!
//! ```text
//! GET    /api/v1/admin/users                      list accounts
//! GET    /api/v1/admin/users/{id}                 fetch one account
//! GET    /api/v1/admin/users/{id}/pets            list an account's pets
//! DELETE /api/v1/admin/users/{id}                 delete account and its pets
//! DELETE /api/v1/admin/users/{id}/pets/{petId}    delete one pet of an account
//! GET    /api/v1/admin/pets?owner=&page=&size=&sort=&direction=
//! ```
//!
//! Admin reads and deletes of individual pets, and the three care actions,
//! go through the regular `/pets` routes; the access gate already lets
//! admins through on any pet.

use actix_web::{delete, get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest, SortDirection, SortField};
use crate::domain::pet::Pet;
use crate::domain::{Error, UserId};
use crate::inbound::http::auth::UserResponse;
use crate::inbound::http::pets::PetResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Pagination and filter query for the admin pets listing.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminPetsQuery {
    /// Restrict to pets owned by this user.
    pub owner: Option<Uuid>,
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size, capped server-side.
    pub size: Option<u32>,
    /// Sort field: `created_at` or `name`.
    pub sort: Option<SortField>,
    /// Sort direction: `asc` or `desc`.
    pub direction: Option<SortDirection>,
}

impl From<&AdminPetsQuery> for PageRequest {
    fn from(query: &AdminPetsQuery) -> Self {
        let defaults = PageRequest::default();
        PageRequest::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(defaults.size()),
            query.sort.unwrap_or(defaults.sort()),
            query.direction.unwrap_or(defaults.direction()),
        )
    }
}

/// Paged envelope returned by the admin pets listing.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetPageResponse {
    /// Items on this page.
    pub items: Vec<PetResponse>,
    /// Zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total matching items.
    pub total: u64,
    /// Total pages at this size.
    pub total_pages: u64,
}

impl From<Page<Pet>> for PetPageResponse {
    fn from(page: Page<Pet>) -> Self {
        let total_pages = page.total_pages();
        let mapped = page.map(|pet| PetResponse::from(&pet));
        Self {
            items: mapped.items,
            page: mapped.page,
            size: mapped.size,
            total: mapped.total,
            total_pages,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse::<UserId>()
        .map_err(|_| Error::invalid_request("user id must be a UUID"))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Admin only", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let caller = session.require_user_id()?;
    let users = state.admin_users.list_users(&caller).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Admin only", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such user", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminGetUser"
)]
#[get("/admin/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_user_id(&path)?;
    let user = state.admin_users.get_user(&caller, &id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// List one account's pets.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}/pets",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Pets", body = [PetResponse]),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Admin only", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such user", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminListUserPets"
)]
#[get("/admin/users/{id}/pets")]
pub async fn list_user_pets(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PetResponse>>> {
    let caller = session.require_user_id()?;
    let id = parse_user_id(&path)?;
    let pets = state.admin_users.list_user_pets(&caller, &id).await?;
    Ok(web::Json(pets.iter().map(PetResponse::from).collect()))
}

/// Delete an account together with every pet it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Account and pets deleted"),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Admin only", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such user", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let id = parse_user_id(&path)?;
    state.admin_users.delete_user(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete one pet belonging to a specific account.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}/pets/{pet_id}",
    params(
        ("id" = Uuid, Path, description = "User identifier"),
        ("pet_id" = Uuid, Path, description = "Pet identifier")
    ),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Admin only, or pet not owned by that user", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "No such user or pet", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUserPet"
)]
#[delete("/admin/users/{id}/pets/{pet_id}")]
pub async fn delete_user_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let (user_raw, pet_raw) = path.into_inner();
    let user = parse_user_id(&user_raw)?;
    let pet = pet_raw
        .parse::<Uuid>()
        .map(Into::into)
        .map_err(|_| Error::invalid_request("pet id must be a UUID"))?;
    state
        .admin_users
        .delete_user_pet(&caller, &user, &pet)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Paginated listing of every pet, optionally filtered to one owner.
#[utoipa::path(
    get,
    path = "/api/v1/admin/pets",
    params(AdminPetsQuery),
    responses(
        (status = 200, description = "One page of pets", body = PetPageResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Admin only", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminListPets"
)]
#[get("/admin/pets")]
pub async fn list_pets(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AdminPetsQuery>,
) -> ApiResult<web::Json<PetPageResponse>> {
    let caller = session.require_user_id()?;
    let query = query.into_inner();
    let owner = query.owner.map(UserId::from);
    let page = state
        .pets
        .list_pets_page(&caller, owner, PageRequest::from(&query))
        .await?;
    Ok(web::Json(PetPageResponse::from(page)))
}
