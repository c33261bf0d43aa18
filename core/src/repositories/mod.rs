//! Repository contracts for session state and the credential store.

pub mod session;
pub mod user;

pub use session::{InMemorySessionStore, SessionStore};
pub use user::{InMemoryUserRepository, UserRepository};
