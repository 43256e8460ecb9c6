//! Full HTTP flow over the assembled application: registration, login,
//! pet care arithmetic, advisory warnings, and the admin listing surface.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use chrono::Utc;
use mockable::DefaultClock;
use serde_json::{json, Value};

use vpet_backend::domain::password_auth_service::PasswordAuthService;
use vpet_backend::domain::pet_service::PetService;
use vpet_backend::domain::ports::{
    InMemoryPetRepository, InMemoryUserRepository, PasswordHasher,
};
use vpet_backend::domain::user::{EmailAddress, Role, User, UserId, Username};
use vpet_backend::domain::user_admin_service::UserAdminService;
use vpet_backend::inbound::http::state::HttpState;
use vpet_backend::inbound::http::{admin, auth, error, pets};
use vpet_backend::middleware::Trace;
use vpet_backend::outbound::security::ShaPasswordHasher;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "password";

fn app() -> App<
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

    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .app_data(error::query_config())
                .wrap(session)
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

async fn login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> (Cookie<'static>, Value) {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    (cookie, actix_test::read_body_json(res).await)
}

#[actix_rt::test]
async fn care_actions_move_stats_and_raise_warnings() {
    let app = actix_test::init_service(app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "secret1",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let (cookie, ada) = login(&app, "ada@example.com", "secret1").await;

    // Unauthenticated writes are refused.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/pets")
            .set_json(json!({"name": "Rex", "breed": "LABRADOR"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/pets")
            .cookie(cookie.clone())
            .set_json(json!({"name": "Rex", "breed": "LABRADOR"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let pet: Value = actix_test::read_body_json(res).await;
    assert_eq!(pet["hunger"], 50);
    assert_eq!(pet["hygiene"], 70);
    assert_eq!(pet["fun"], 60);
    let pet_id = pet["id"].as_str().expect("pet id").to_owned();

    // Play: hunger +15, fun +40 (clamped at 100).
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/pets/{pet_id}/actions/play"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["hunger"], 65);
    assert_eq!(body["hygiene"], 70);
    assert_eq!(body["fun"], 100);
    assert_eq!(body["actionCount"], 1);
    assert!(body.get("warnings").is_none());

    // Wash: hunger +10 crosses the warning line at 75.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/pets/{pet_id}/actions/wash"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["hunger"], 75);
    assert_eq!(body["hygiene"], 100);
    assert_eq!(body["fun"], 80);
    assert_eq!(body["warnings"], json!(["hunger_high"]));

    // Feed: hunger -70 clears the warning.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/pets/{pet_id}/actions/feed"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["hunger"], 5);
    assert_eq!(body["hygiene"], 95);
    assert_eq!(body["fun"], 70);
    assert_eq!(body["actionCount"], 3);
    assert_eq!(body["lifeStage"], "BABY");
    assert!(body.get("warnings").is_none());

    // The admin sees the pet through the paged listing, filtered by owner.
    let (admin_cookie, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let owner_id = ada["id"].as_str().expect("owner id");
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/admin/pets?owner={owner_id}"))
            .cookie(admin_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = actix_test::read_body_json(res).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Rex");

    // Logout invalidates the session.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn admin_listing_is_forbidden_for_members() {
    let app = actix_test::init_service(app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "secret1",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let (cookie, _) = login(&app, "bob@example.com", "secret1").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/pets")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
