//! # Infrastructure Layer
//!
//! Concrete implementations of the contracts defined in `gk_core`:
//!
//! - **Cache**: Redis client with retry logic, the Redis-backed session
//!   state store
//! - **Services**: Redis fixed-window rate limiter
//! - **Database**: MySQL credential store using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

use gk_core::errors::StoreError;

/// Cache module - Redis client and session state
pub mod cache;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Services module - Infrastructure service implementations
pub mod services;

/// Configuration types consumed by this crate
pub mod config {
    pub use gk_shared::config::{CacheConfig, DatabaseConfig, RateLimitConfig};
}

pub use cache::{RedisClient, RedisSessionStore};
#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlUserRepository};
pub use services::RedisRateLimiter;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation did not complete in time
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(error: InfrastructureError) -> Self {
        StoreError::unavailable(error)
    }
}
