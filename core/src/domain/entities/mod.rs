//! Domain entities representing core business objects.

pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use token::{Claims, TokenClaims, TokenKind, TokenPair, TOKEN_TYPE_BEARER};
pub use user::User;
