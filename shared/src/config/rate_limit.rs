//! Rate limiting configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{env_duration, env_parse};

/// Fixed-window rate limiting configuration applied per client IP
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Requests allowed per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_requests: 100,
            window_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_parse("RATE_LIMIT_ENABLED", defaults.enabled),
            max_requests: env_parse("RATE_LIMIT_REQUESTS", defaults.max_requests),
            window_seconds: env_duration(
                "RATE_LIMIT_WINDOW",
                Duration::from_secs(defaults.window_seconds),
            )
            .as_secs()
            .max(1),
        }
    }

    /// Window as a `Duration`
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

fn default_enabled() -> bool {
    true
}
