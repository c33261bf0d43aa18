//! Fixed-window rate limiting
//!
//! A window opens on the first hit for an identifier and lasts the configured
//! duration; later hits never extend it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::StoreError;

/// Namespace for rate-limit counters
pub const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";

/// Counter key for `identifier`
pub fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", RATE_LIMIT_KEY_PREFIX, identifier)
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request fits in the current window
    pub allowed: bool,
    /// Hits counted in the current window, including this one
    pub count: u64,
    /// Hits permitted per window
    pub limit: u64,
    /// Time until the current window closes
    pub reset_after: Duration,
}

impl RateLimitDecision {
    pub fn new(count: u64, limit: u64, reset_after: Duration) -> Self {
        Self {
            allowed: count <= limit,
            count,
            limit,
            reset_after,
        }
    }

    /// Hits left in the current window
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

/// Counts requests per identifier in fixed windows
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request for `identifier` and decide whether it is allowed
    async fn hit(&self, identifier: &str) -> Result<RateLimitDecision, StoreError>;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    resets_at: Instant,
}

/// Process-local rate limiter
#[derive(Clone)]
pub struct InMemoryRateLimiter {
    limit: u64,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl InMemoryRateLimiter {
    pub fn new(limit: u64, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn hit(&self, identifier: &str) -> Result<RateLimitDecision, StoreError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        // Closed windows are dropped so the next hit opens a fresh one
        windows.retain(|_, w| w.resets_at > now);

        let window = windows
            .entry(rate_limit_key(identifier))
            .or_insert(Window {
                count: 0,
                resets_at: now + self.window,
            });
        window.count += 1;

        Ok(RateLimitDecision::new(
            window.count,
            self.limit,
            window.resets_at - now,
        ))
    }
}
