//! Application state and factory
//!
//! This module holds the shared application state and builds the actix-web
//! application used by both the server binary and the HTTP tests.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::{AuthService, PasswordHasher, RateLimiter};
use gk_shared::errors::{error_codes, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::error::json_error_handler;
use crate::middleware::{AccessTokenVerifier, JwtAuth, RateLimit};
use crate::routes::{auth, health};

/// State shared by every worker
pub struct AppState<U, S, H>
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    pub auth_service: Arc<AuthService<U, S, H>>,
    /// Per-client limiter for `/api/v1`; `None` disables rate limiting
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub health_probes: Vec<Arc<dyn health::HealthProbe>>,
}

impl<U, S, H> AppState<U, S, H>
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    pub fn new(auth_service: Arc<AuthService<U, S, H>>) -> Self {
        Self {
            auth_service,
            rate_limiter: None,
            health_probes: Vec::new(),
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_health_probe(mut self, probe: Arc<dyn health::HealthProbe>) -> Self {
        self.health_probes.push(probe);
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, S, H>(
    app_state: web::Data<AppState<U, S, H>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    let verifier: Arc<dyn AccessTokenVerifier> = app_state.auth_service.tokens().clone();
    let jwt_auth = JwtAuth::new(verifier);
    let rate_limit = RateLimit::new(app_state.rate_limiter.clone());

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::health_check::<U, S, H>))
        .service(
            web::scope("/api/v1")
                .wrap(rate_limit)
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register::<U, S, H>))
                        .route("/login", web::post().to(auth::login::<U, S, H>))
                        .route("/refresh", web::post().to(auth::refresh::<U, S, H>))
                        .route(
                            "/logout",
                            web::post()
                                .to(auth::logout::<U, S, H>)
                                .wrap(jwt_auth.clone()),
                        )
                        .route(
                            "/verify",
                            web::get().to(auth::verify).wrap(jwt_auth.clone()),
                        )
                        .route(
                            "/me",
                            web::get().to(auth::me::<U, S, H>).wrap(jwt_auth),
                        ),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
