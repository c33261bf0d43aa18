//! Redis-based fixed-window rate limiter

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use gk_core::errors::StoreError;
use gk_core::services::auth::{rate_limit_key, RateLimitDecision, RateLimiter};
use gk_shared::RateLimitConfig;

use crate::cache::redis_client::RedisClient;

/// Redis-based implementation of the rate limiter trait
///
/// Counters live under `rate_limit:<identifier>`; the window starts with the
/// first hit and is never extended by later ones.
#[derive(Clone)]
pub struct RedisRateLimiter {
    redis_client: RedisClient,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    /// Create a new Redis-based rate limiter
    pub fn new(redis_client: RedisClient, config: RateLimitConfig) -> Self {
        Self {
            redis_client,
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn hit(&self, identifier: &str) -> Result<RateLimitDecision, StoreError> {
        let window = self
            .redis_client
            .increment_in_window(&rate_limit_key(identifier), self.config.window_seconds)
            .await?;

        let decision = RateLimitDecision::new(
            window.count,
            u64::from(self.config.max_requests),
            Duration::from_secs(window.ttl_seconds),
        );

        if !decision.allowed {
            warn!(
                identifier = %identifier,
                count = decision.count,
                limit = decision.limit,
                "Rate limit exceeded"
            );
        }

        Ok(decision)
    }
}
