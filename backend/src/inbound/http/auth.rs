//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada","email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/login    {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::auth::{AuthValidationError, LoginCredentials, Registration};
use crate::domain::user::{User, UserValidationError};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Requested handle, 3 to 50 characters.
    pub username: String,
    /// Login email, stored lower-cased.
    pub email: String,
    /// Plain password, 6 to 100 characters; hashed before storage.
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable identifier.
    pub id: String,
    /// Display handle.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Granted roles, lower-case tags.
    pub roles: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            roles: user.roles().iter().map(|r| r.as_str().to_owned()).collect(),
        }
    }
}

fn map_validation_error(err: AuthValidationError) -> Error {
    let (message, field, code) = match &err {
        AuthValidationError::User(user_err) => match user_err {
            UserValidationError::EmptyUsername
            | UserValidationError::UsernameTooShort { .. }
            | UserValidationError::UsernameTooLong { .. } => {
                (err.to_string(), "username", "invalid_username")
            }
            UserValidationError::EmptyEmail
            | UserValidationError::EmailTooLong { .. }
            | UserValidationError::InvalidEmail => (err.to_string(), "email", "invalid_email"),
        },
        AuthValidationError::EmptyPassword
        | AuthValidationError::PasswordTooShort { .. }
        | AuthValidationError::PasswordTooLong { .. } => {
            (err.to_string(), "password", "invalid_password")
        }
    };
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Register a new account. The caller is not logged in afterwards; clients
/// follow up with a login request.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Email or username already taken", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration =
        Registration::try_from_parts(&payload.username, &payload.email, &payload.password)
            .map_err(map_validation_error)?;
    let user = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::inbound::http::error::ApiError),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_validation_error)?;
    let user = state.auth.login(credentials).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
