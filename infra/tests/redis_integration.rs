//! Integration tests for the Redis-backed session store and rate limiter
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p gk_infra --test redis_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use gk_core::errors::AuthError;
use gk_core::repositories::SessionStore;
use gk_core::services::auth::RateLimiter;
use gk_core::services::token::{TokenLifecycle, TokenServiceConfig};
use gk_infra::cache::{CacheConfig, RedisClient, RedisSessionStore};
use gk_infra::services::RedisRateLimiter;
use gk_shared::RateLimitConfig;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

async fn client() -> RedisClient {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let prefix = format!("gk-test-{}", Uuid::new_v4());
    RedisClient::new(CacheConfig::new(url).with_prefix(prefix))
        .await
        .expect("Failed to connect to Redis")
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_health_check() {
    let client = client().await;
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_session_store_roundtrip() {
    let store = RedisSessionStore::new(client().await);
    let cancel = CancellationToken::new();

    store
        .put_session("subject-1", "token-a", Duration::from_secs(60), &cancel)
        .await
        .unwrap();
    assert_eq!(
        store.get_session("subject-1", &cancel).await.unwrap(),
        Some("token-a".to_string())
    );

    let ttl = store.client().ttl("refresh:subject-1").await.unwrap();
    assert!(matches!(ttl, Some(secs) if secs <= 60 && secs > 50));

    store.delete_session("subject-1", &cancel).await.unwrap();
    store.delete_session("subject-1", &cancel).await.unwrap();
    assert_eq!(store.get_session("subject-1", &cancel).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_blacklist_expires() {
    let store = RedisSessionStore::new(client().await);
    let cancel = CancellationToken::new();

    store.blacklist("tok", Duration::from_secs(1), &cancel).await.unwrap();
    store.blacklist("tok", Duration::from_secs(1), &cancel).await.unwrap();
    assert!(store.is_blacklisted("tok", &cancel).await.unwrap());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(!store.is_blacklisted("tok", &cancel).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_lifecycle_reuse_detection_against_redis() {
    let store = Arc::new(RedisSessionStore::new(client().await));
    let manager = TokenLifecycle::new(
        store,
        TokenServiceConfig::default().with_secret("redis-integration-secret"),
    );
    let cancel = CancellationToken::new();
    let subject = Uuid::new_v4().to_string();

    let original = manager.issue(&subject, &cancel).await.unwrap();
    let rotated = manager.refresh(&original.refresh_token, &cancel).await.unwrap();

    assert_eq!(
        manager.refresh(&original.refresh_token, &cancel).await,
        Err(AuthError::TokenReuseDetected)
    );
    assert_eq!(
        manager.refresh(&rotated.refresh_token, &cancel).await,
        Err(AuthError::SessionNotFound)
    );
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_rate_limiter_fixed_window() {
    let config = RateLimitConfig {
        enabled: true,
        max_requests: 2,
        window_seconds: 60,
    };
    let limiter = RedisRateLimiter::new(client().await, config);

    assert!(limiter.hit("10.0.0.1").await.unwrap().allowed);
    assert!(limiter.hit("10.0.0.1").await.unwrap().allowed);

    let third = limiter.hit("10.0.0.1").await.unwrap();
    assert!(!third.allowed);
    assert_eq!(third.count, 3);
    assert!(third.reset_after <= Duration::from_secs(60));
}
