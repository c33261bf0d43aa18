//! Input rules for registration and login, backed by the `validator` crate
//!
//! Request DTOs apply the same rules through `#[derive(Validate)]`; these
//! helpers cover callers that reach the domain without going through HTTP.

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted email length (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Check an email address for plausible shape and length
pub fn is_email_valid(email: &str) -> bool {
    validator::validate_length(email, Some(3), Some(MAX_EMAIL_LENGTH as u64), None)
        && validator::validate_email(email)
}

/// Check a password has at least `min` characters
pub fn is_password_long_enough(password: &str, min: usize) -> bool {
    validator::validate_length(password, Some(min as u64), None, None)
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
