//! Configuration for the token service

use chrono::Duration;
use gk_shared::config::auth::{AuthConfig, JwtConfig, DEFAULT_JWT_SECRET};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_secs: i64,
    /// Clock-skew tolerance applied to `exp`, in seconds
    pub leeway_secs: u64,
    /// Upper bound for a single lifecycle operation
    pub operation_timeout: Option<std::time::Duration>,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_expiry_secs: 15 * 60,
            refresh_token_expiry_secs: 7 * 24 * 60 * 60,
            leeway_secs: 0,
            operation_timeout: None,
        }
    }
}

impl TokenServiceConfig {
    /// Build from the JWT section of the application configuration
    pub fn from_jwt_config(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            access_token_expiry_secs: jwt.access_token_expiry,
            refresh_token_expiry_secs: jwt.refresh_token_expiry,
            leeway_secs: jwt.leeway,
            operation_timeout: None,
        }
    }

    /// Build from the auth configuration, including the operation timeout
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        Self {
            operation_timeout: auth.operation_timeout(),
            ..Self::from_jwt_config(&auth.jwt)
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    pub fn with_lifetimes(mut self, access_secs: i64, refresh_secs: i64) -> Self {
        self.access_token_expiry_secs = access_secs;
        self.refresh_token_expiry_secs = refresh_secs;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    pub fn access_lifetime(&self) -> Duration {
        Duration::seconds(self.access_token_expiry_secs)
    }

    pub fn refresh_lifetime(&self) -> Duration {
        Duration::seconds(self.refresh_token_expiry_secs)
    }
}
