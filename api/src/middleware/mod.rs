pub mod auth;
pub mod rate_limit;

pub use auth::{AccessTokenVerifier, AuthContext, JwtAuth};
pub use rate_limit::RateLimit;
