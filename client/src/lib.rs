//! Gatekeep API client
//!
//! A thin async wrapper over the `/api/v1/auth` endpoints for services that
//! delegate authentication to Gatekeep.

pub mod client;
pub mod error;

pub use client::{AuthClient, RegisteredUser, Tokens, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
