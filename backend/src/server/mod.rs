//! Server construction and middleware wiring.

mod config;
mod seed;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use mockable::{Clock, DefaultClock};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use vpet_backend::doc::ApiDoc;
use vpet_backend::domain::password_auth_service::PasswordAuthService;
use vpet_backend::domain::pet_service::PetService;
use vpet_backend::domain::ports::{
    InMemoryPetRepository, InMemoryUserRepository, PetRepository, UserRepository,
};
use vpet_backend::domain::user_admin_service::UserAdminService;
use vpet_backend::inbound::http::health::{live, ready, HealthState};
use vpet_backend::inbound::http::state::HttpState;
use vpet_backend::inbound::http::{admin, auth, error, pets};
use vpet_backend::outbound::persistence::{DieselPetRepository, DieselUserRepository};
use vpet_backend::outbound::security::ShaPasswordHasher;
use vpet_backend::Trace;

/// Wire the domain services over a concrete repository pair.
async fn build_state<U, P>(users: Arc<U>, pets: Arc<P>) -> HttpState
where
    U: UserRepository + 'static,
    P: PetRepository + 'static,
{
    let hasher = Arc::new(ShaPasswordHasher::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    seed::seed_admin(users.as_ref(), hasher.as_ref()).await;

    HttpState::new(
        Arc::new(PasswordAuthService::new(
            Arc::clone(&users),
            hasher,
            Arc::clone(&clock),
        )),
        Arc::new(PetService::new(Arc::clone(&pets), Arc::clone(&users), clock)),
        Arc::new(UserAdminService::new(users, pets)),
    )
}

/// Build the HTTP state from configuration.
///
/// Uses database-backed repositories when a pool is available, otherwise
/// falls back to in-memory stores for local development.
async fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            build_state(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPetRepository::new(pool.clone())),
            )
            .await
        }
        None => {
            tracing::warn!("no database pool configured; using in-memory repositories");
            build_state(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPetRepository::new()),
            )
            .await
        }
    };
    web::Data::new(state)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
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
        .service(admin::list_pets);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config).await;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
