//! Shared configuration and common types for the Gatekeep server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types loaded from the environment
//! - Error response structures for the HTTP layer
//! - Input validation helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig,
    LoggingConfig, RateLimitConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
