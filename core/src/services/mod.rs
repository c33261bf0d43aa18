//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, InMemoryRateLimiter, PasswordHasher,
    RateLimitDecision, RateLimiter,
};
pub use token::{TokenCodec, TokenLifecycle, TokenServiceConfig};
