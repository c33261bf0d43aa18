//! Configuration for the authentication service

use gk_shared::config::auth::AuthConfig;
use gk_shared::validation::MIN_PASSWORD_LENGTH;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Minimum password length accepted at registration
    pub min_password_length: usize,
    /// bcrypt cost factor
    pub password_hash_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            min_password_length: MIN_PASSWORD_LENGTH,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthServiceConfig {
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        Self {
            password_hash_cost: auth.password_hash_cost,
            ..Self::default()
        }
    }
}
