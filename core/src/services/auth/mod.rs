//! Authentication service module
//!
//! This module provides the account-facing operations around the token
//! lifecycle:
//! - User registration with bcrypt password hashing
//! - Credential login issuing a token pair
//! - Refresh, logout and request authorization
//! - Fixed-window rate limiting

mod config;
mod password;
mod rate_limiter;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{BcryptPasswordHasher, PasswordHasher};
pub use rate_limiter::{
    rate_limit_key, InMemoryRateLimiter, RateLimitDecision, RateLimiter, RATE_LIMIT_KEY_PREFIX,
};
pub use service::AuthService;
