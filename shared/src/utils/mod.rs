//! Common utility functions

pub mod validation;

pub use validation::{is_email_valid, is_password_long_enough, normalize_email};
