//! Domain layer containing tokens, users and their invariants.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
