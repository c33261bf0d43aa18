//! Configuration module with concern-specific sub-modules
//!
//! - `auth` - JWT signing and token lifetime configuration
//! - `cache` - Redis connection used for session state and rate limiting
//! - `database` - Credential store connection pool
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Fixed-window request limits
//! - `server` - HTTP server configuration

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use auth::{AuthConfig, JwtConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` beforehand if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let logging = LoggingConfig::from_env(environment);

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            logging,
        }
    }

    /// Check the configuration for values that must not reach production
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.jwt.secret.trim().is_empty() {
            return Err("JWT secret must not be empty".to_string());
        }
        if self.environment.is_production() && self.auth.jwt.is_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.auth.jwt.access_token_expiry <= 0 || self.auth.jwt.refresh_token_expiry <= 0 {
            return Err("Token lifetimes must be positive".to_string());
        }
        if self.auth.jwt.access_token_expiry >= self.auth.jwt.refresh_token_expiry {
            return Err("Access token lifetime must be shorter than refresh token lifetime".to_string());
        }
        Ok(())
    }
}

/// Read a duration such as `15m` or `168h` from the environment
pub(crate) fn env_duration(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|value| humantime::parse_duration(value.trim()).ok())
        .unwrap_or(default)
}

/// Read a parseable value from the environment
pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        assert!(config.validate().is_err());

        config.auth.jwt = JwtConfig::new("a-long-production-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_access_lifetime_must_be_shorter() {
        let mut config = AppConfig::default();
        config.auth.jwt.access_token_expiry = config.auth.jwt.refresh_token_expiry;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_duration_falls_back_on_garbage() {
        let fallback = Duration::from_secs(42);
        assert_eq!(env_duration("GK_TEST_UNSET_DURATION", fallback), fallback);
    }
}
