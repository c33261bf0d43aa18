//! End-to-end HTTP tests against the in-memory stores

use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    test, web,
};
use async_trait::async_trait;
use gk_api::{create_app, AppState, HealthProbe};
use gk_core::errors::StoreError;
use gk_core::repositories::{InMemorySessionStore, InMemoryUserRepository};
use gk_core::services::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, InMemoryRateLimiter, RateLimitDecision,
    RateLimiter, TokenLifecycle, TokenServiceConfig,
};
use serde_json::{json, Value};

type TestState = AppState<InMemoryUserRepository, InMemorySessionStore, BcryptPasswordHasher>;

const CLIENT: &str = "192.0.2.10:40000";
const PASSWORD: &str = "correct-horse";

fn test_state() -> TestState {
    let tokens = Arc::new(TokenLifecycle::new(
        Arc::new(InMemorySessionStore::new()),
        TokenServiceConfig::default().with_secret("http-test-secret"),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(BcryptPasswordHasher::new(4)),
        tokens,
        AuthServiceConfig::default(),
    ));
    AppState::new(auth_service)
}

fn post_json(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .peer_addr(CLIENT.parse().unwrap())
        .set_json(body)
}

fn get_with_bearer(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .peer_addr(CLIENT.parse().unwrap())
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

/// Registers `$email` and logs in, yielding the token response body
macro_rules! register_and_login {
    ($app:expr, $email:expr) => {{
        let req = post_json(
            "/api/v1/auth/register",
            json!({ "email": $email, "password": PASSWORD }),
        )
        .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = post_json(
            "/api/v1/auth/login",
            json!({ "email": $email, "password": PASSWORD }),
        )
        .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

struct DownProbe;

#[async_trait]
impl HealthProbe for DownProbe {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn is_healthy(&self) -> bool {
        false
    }
}

struct FailingRateLimiter;

#[async_trait]
impl RateLimiter for FailingRateLimiter {
    async fn hit(&self, _identifier: &str) -> Result<RateLimitDecision, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }
}

#[actix_web::test]
async fn test_health_reports_healthy() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_health_reports_unreachable_dependency() {
    let state = test_state().with_health_probe(Arc::new(DownProbe));
    let app = test::init_service(create_app(web::Data::new(state))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["redis"], "down");
}

#[actix_web::test]
async fn test_register_returns_user_without_hash() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let req = post_json(
        "/api/v1/auth/register",
        json!({ "email": "alice@example.com", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].is_string());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn test_register_duplicate_email_conflicts() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let body = json!({ "email": "bob@example.com", "password": PASSWORD });

    let resp = test::call_service(&app, post_json("/api/v1/auth/register", body.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, post_json("/api/v1/auth/register", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFLICT");
}

#[actix_web::test]
async fn test_register_rejects_invalid_input() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let req = post_json(
        "/api/v1/auth/register",
        json!({ "email": "carol@example.com", "password": "short" }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(
        body["details"]["fields"]["password"][0],
        "must be at least 8 characters"
    );

    let req = post_json(
        "/api/v1/auth/register",
        json!({ "email": "not-an-email", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["fields"]["email"].is_array());
    assert!(body["details"]["fields"].get("password").is_none());

    let resp = test::call_service(&app, post_json("/api/v1/auth/register", json!({})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_rejects_malformed_email_before_lookup() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let req = post_json(
        "/api/v1/auth/login",
        json!({ "email": "not-an-email", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let _ = register_and_login!(app, "dave@example.com");

    let req = post_json(
        "/api/v1/auth/login",
        json!({ "email": "dave@example.com", "password": "wrong-password" }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(resp).await;

    let req = post_json(
        "/api/v1/auth/login",
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[actix_web::test]
async fn test_login_returns_bearer_pair() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let tokens = register_and_login!(app, "erin@example.com");

    assert_eq!(tokens["token_type"], "Bearer");
    assert!(tokens["expires_in"].as_i64().unwrap() > 0);
    assert_ne!(tokens["access_token"], tokens["refresh_token"]);

    let access = tokens["access_token"].as_str().unwrap();
    let resp = test::call_service(&app, get_with_bearer("/api/v1/auth/me", access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["email"], "erin@example.com");
}

#[actix_web::test]
async fn test_verify_resolves_access_token_to_user_id() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let tokens = register_and_login!(app, "olivia@example.com");
    let access = tokens["access_token"].as_str().unwrap();

    let resp = test::call_service(&app, get_with_bearer("/api/v1/auth/me", access).to_request()).await;
    let me: Value = test::read_body_json(resp).await;

    let resp = test::call_service(&app, get_with_bearer("/api/v1/auth/verify", access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let verified: Value = test::read_body_json(resp).await;
    assert_eq!(verified["user_id"], me["id"]);

    let refresh = tokens["refresh_token"].as_str().unwrap();
    let resp = test::call_service(&app, get_with_bearer("/api/v1/auth/verify", refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/v1/auth/verify").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_refresh_rotates_and_detects_reuse() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let tokens = register_and_login!(app, "frank@example.com");
    let original = tokens["refresh_token"].as_str().unwrap().to_string();

    let req = post_json("/api/v1/auth/refresh", json!({ "refresh_token": original })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated: Value = test::read_body_json(resp).await;
    let rotated_refresh = rotated["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated_refresh, original);

    // Presenting the superseded token revokes the session
    let req = post_json("/api/v1/auth/refresh", json!({ "refresh_token": original })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = post_json("/api/v1/auth/refresh", json!({ "refresh_token": rotated_refresh })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_refresh_requires_token() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let resp = test::call_service(&app, post_json("/api/v1/auth/refresh", json!({})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = post_json("/api/v1/auth/refresh", json!({ "refresh_token": "garbage" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_revokes_access_and_session() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let tokens = register_and_login!(app, "grace@example.com");
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .peer_addr(CLIENT.parse().unwrap())
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, get_with_bearer("/api/v1/auth/me", access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = post_json("/api/v1/auth/refresh", json!({ "refresh_token": refresh })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_protected_routes_require_access_token() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;
    let tokens = register_and_login!(app, "heidi@example.com");

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");

    let refresh = tokens["refresh_token"].as_str().unwrap();
    let resp = test::call_service(&app, get_with_bearer("/api/v1/auth/me", refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post().uri("/api/v1/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_rate_limit_rejects_excess_requests() {
    let limiter = Arc::new(InMemoryRateLimiter::new(2, Duration::from_secs(60)));
    let state = test_state().with_rate_limiter(limiter);
    let app = test::init_service(create_app(web::Data::new(state))).await;
    let body = json!({ "email": "ivan@example.com", "password": PASSWORD });

    for remaining in ["1", "0"] {
        let resp = test::call_service(&app, post_json("/api/v1/auth/login", body.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), remaining);
    }

    let resp = test::call_service(&app, post_json("/api/v1/auth/login", body.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = resp
        .headers()
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"], "RATE_LIMIT_EXCEEDED");

    // Other clients and the health endpoint are unaffected
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr("192.0.2.99:40000".parse().unwrap())
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(CLIENT.parse().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_rate_limiter_outage_allows_requests() {
    let state = test_state().with_rate_limiter(Arc::new(FailingRateLimiter));
    let app = test::init_service(create_app(web::Data::new(state))).await;

    let req = post_json(
        "/api/v1/auth/register",
        json!({ "email": "judy@example.com", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().get("x-ratelimit-remaining").is_none());
}

#[actix_web::test]
async fn test_unknown_route_is_not_found() {
    let app = test::init_service(create_app(web::Data::new(test_state()))).await;

    let req = test::TestRequest::get().uri("/api/v2/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
