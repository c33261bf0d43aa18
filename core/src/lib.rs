//! # Gatekeep Core
//!
//! Core domain layer for the Gatekeep server: token entities, the HS256
//! token codec, the token lifecycle manager with refresh-token reuse
//! detection, the authentication service, and the repository contracts
//! (session state store, credential store) the infrastructure implements.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::{InMemorySessionStore, InMemoryUserRepository, SessionStore, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, InMemoryRateLimiter, PasswordHasher,
    RateLimitDecision, RateLimiter, TokenCodec, TokenLifecycle, TokenServiceConfig,
};
