//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Registration and login
//! - Token refresh (rotation with reuse detection)
//! - Logout, token verification and identity lookup for authenticated callers

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod verify;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh;
pub use register::register;
pub use verify::verify;
