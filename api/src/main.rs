use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use gk_api::{create_app, AppState};
use gk_core::services::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, TokenLifecycle, TokenServiceConfig,
};
use gk_infra::{DatabasePool, MySqlUserRepository, RedisClient, RedisRateLimiter, RedisSessionStore};
use gk_shared::config::{AppConfig, LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);
    config.validate().map_err(anyhow::Error::msg)?;

    info!(environment = %config.environment, "Starting Gatekeep API server");

    let database = Arc::new(
        DatabasePool::new(config.database.clone())
            .await
            .context("failed to connect to the credential store")?,
    );
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;

    let redis = RedisClient::new(config.cache.clone())
        .await
        .context("failed to connect to Redis")?;

    let users = Arc::new(MySqlUserRepository::new(database.get_pool().clone()));
    let sessions = Arc::new(RedisSessionStore::new(redis.clone()));
    let tokens = Arc::new(TokenLifecycle::new(
        sessions,
        TokenServiceConfig::from_auth_config(&config.auth),
    ));
    let hasher = Arc::new(BcryptPasswordHasher::new(config.auth.password_hash_cost));
    let auth_service = Arc::new(AuthService::new(
        users,
        hasher,
        tokens,
        AuthServiceConfig::from_auth_config(&config.auth),
    ));

    let mut state = AppState::new(auth_service)
        .with_health_probe(Arc::new(redis.clone()))
        .with_health_probe(database.clone());
    if config.rate_limit.enabled {
        info!(
            max_requests = config.rate_limit.max_requests,
            window_seconds = config.rate_limit.window_seconds,
            "Rate limiting enabled"
        );
        state = state.with_rate_limiter(Arc::new(RedisRateLimiter::new(
            redis.clone(),
            config.rate_limit.clone(),
        )));
    }
    let state = web::Data::new(state);

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .client_request_timeout(Duration::from_secs(config.server.request_timeout));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
