//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - HS256 token minting and verification (`TokenCodec`)
//! - Issue, rotation with reuse detection, logout and authorization
//!   against the session store (`TokenLifecycle`)

mod codec;
mod config;
mod lifecycle;


pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use lifecycle::TokenLifecycle;
