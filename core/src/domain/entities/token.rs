//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Value of the `token_type` field returned with every token pair
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Purpose a token was minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential authorizing individual requests
    Access,
    /// Long-lived credential exchanged for a new token pair
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for the JWT payload as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Token kind
    pub kind: TokenKind,

    /// JWT ID; keeps tokens minted within the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims for `subject` expiring `lifetime` from now
    pub fn new(subject: &str, kind: TokenKind, lifetime: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            kind,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Typed, verified view of a token's claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Time left until expiry, zero once elapsed
    pub fn remaining_lifetime(&self) -> std::time::Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    /// Checks whether the embedded expiry has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl TryFrom<Claims> for TokenClaims {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.sub.trim().is_empty() || claims.jti.is_empty() {
            return Err(TokenError::Malformed);
        }

        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or(TokenError::Malformed)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;

        Ok(Self {
            subject: claims.sub,
            kind: claims.kind,
            issued_at,
            expires_at,
        })
    }
}

/// Access and refresh token issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            refresh_expires_in,
        }
    }
}
