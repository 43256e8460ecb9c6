//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use chrono::Utc;
use mockable::DefaultClock;

use crate::domain::password_auth_service::PasswordAuthService;
use crate::domain::pet_service::PetService;
use crate::domain::ports::{InMemoryPetRepository, InMemoryUserRepository, PasswordHasher};
use crate::domain::user::{EmailAddress, Role, User, UserId, Username};
use crate::domain::user_admin_service::UserAdminService;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin, auth, error, pets};
use crate::middleware::Trace;
use crate::outbound::security::ShaPasswordHasher;

/// Email of the administrator account every test app starts with.
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Password of the seeded administrator account.
pub const ADMIN_PASSWORD: &str = "password";

/// Password used for every account created via [`login_session`].
pub const MEMBER_PASSWORD: &str = "secret1";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build an app over in-memory repositories with an administrator seeded.
///
/// A low hash cost keeps the suite fast; digests record their own cost, so
/// verification is unaffected.
pub fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let users = Arc::new(InMemoryUserRepository::new());
    let pet_store = Arc::new(InMemoryPetRepository::new());
    let hasher = Arc::new(ShaPasswordHasher::with_iterations(4));

    users.seed(User::new(
        UserId::random(),
        Username::new("admin").expect("seed username"),
        EmailAddress::new(ADMIN_EMAIL).expect("seed email"),
        hasher.hash(ADMIN_PASSWORD),
        vec![Role::Admin],
        Utc::now(),
    ));

    let state = HttpState::new(
        Arc::new(PasswordAuthService::new(
            Arc::clone(&users),
            hasher,
            Arc::new(DefaultClock),
        )),
        Arc::new(PetService::new(
            Arc::clone(&pet_store),
            Arc::clone(&users),
            Arc::new(DefaultClock),
        )),
        Arc::new(UserAdminService::new(users, pet_store)),
    );

    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .app_data(error::query_config())
                .wrap(test_session_middleware())
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(pets::create_pet)
                .service(pets::list_pets)
                .service(pets::get_pet)
                .service(pets::update_pet)
                .service(pets::delete_pet)
                .service(pets::feed_pet)
                .service(pets::wash_pet)
                .service(pets::play_with_pet)
                .service(admin::list_users)
                .service(admin::get_user)
                .service(admin::list_user_pets)
                .service(admin::delete_user)
                .service(admin::delete_user_pet)
                .service(admin::list_pets),
        )
}

async fn post_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login should succeed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Register `name` as a fresh member account and return its session cookie.
///
/// The account uses `{name}@example.com` and [`MEMBER_PASSWORD`].
pub async fn login_session(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    name: &str,
) -> Cookie<'static> {
    let email = format!("{name}@example.com");
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(serde_json::json!({
                "username": name,
                "email": email,
                "password": MEMBER_PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED, "registration should succeed");
    post_login(app, &email, MEMBER_PASSWORD).await
}

/// Log in as the seeded administrator and return its session cookie.
pub async fn login_admin(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    post_login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}
