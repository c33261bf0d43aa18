//! Error types for credential checks, token handling and session state

use thiserror::Error;

/// Caller-visible outcomes of the authentication and token lifecycle operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    /// Malformed token, bad signature or wrong token kind
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    /// No session record for the subject (expired, logged out, or revoked)
    #[error("Session not found")]
    SessionNotFound,

    /// A superseded refresh token was presented; the session has been revoked
    #[error("Refresh token reuse detected")]
    TokenReuseDetected,

    /// Blacklisted or otherwise unverifiable access token
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Session store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    /// Signing backend fault
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl AuthError {
    /// Transient infrastructure faults are retried by the caller
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable { .. } | AuthError::Cancelled)
    }
}

/// Token codec verification failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature mismatch or an algorithm other than the configured one
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    /// Not a compact token, or claims missing / of the wrong type
    #[error("Malformed token")]
    Malformed,
}

impl From<TokenError> for AuthError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::InvalidSignature | TokenError::Malformed => AuthError::InvalidToken,
        }
    }
}

/// Session state store failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Store operation cancelled")]
    Cancelled,
}

impl StoreError {
    /// Construct an `Unavailable` error from any displayable fault
    pub fn unavailable(error: impl std::fmt::Display) -> Self {
        StoreError::Unavailable {
            message: error.to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable { message } => AuthError::StoreUnavailable { message },
            StoreError::Cancelled => AuthError::Cancelled,
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}
