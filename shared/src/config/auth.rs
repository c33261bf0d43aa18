//! Authentication and token lifetime configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{env_duration, env_parse};

/// Secret used when `JWT_SECRET` is not provided
pub const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC secret for signing tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// Allowed clock skew in seconds when checking expiry
    #[serde(default)]
    pub leeway: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 900,      // 15 minutes
            refresh_token_expiry: 604800,  // 7 days
            leeway: 0,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Lifetimes accept human readable durations (`15m`, `168h`).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);
        let access = env_duration(
            "JWT_ACCESS_EXPIRY",
            Duration::from_secs(defaults.access_token_expiry as u64),
        );
        let refresh = env_duration(
            "JWT_REFRESH_EXPIRY",
            Duration::from_secs(defaults.refresh_token_expiry as u64),
        );
        let leeway = env_duration("JWT_LEEWAY", Duration::from_secs(defaults.leeway));

        Self {
            secret,
            access_token_expiry: access.as_secs() as i64,
            refresh_token_expiry: refresh.as_secs() as i64,
            leeway: leeway.as_secs(),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the clock skew leeway in seconds
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Whether the built-in development secret is still in use
    pub fn is_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Authentication service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// bcrypt cost factor for password hashing
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,

    /// Upper bound for a single lifecycle operation in milliseconds (0 disables)
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            password_hash_cost: default_password_hash_cost(),
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            password_hash_cost: env_parse("PASSWORD_HASH_COST", default_password_hash_cost()),
            operation_timeout_ms: env_duration(
                "AUTH_OPERATION_TIMEOUT",
                Duration::from_millis(default_operation_timeout_ms()),
            )
            .as_millis() as u64,
        }
    }

    /// Get the JWT secret (convenience accessor)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret
    }

    /// Operation timeout, `None` when disabled
    pub fn operation_timeout(&self) -> Option<Duration> {
        match self.operation_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn default_password_hash_cost() -> u32 {
    12
}

fn default_operation_timeout_ms() -> u64 {
    5000
}
