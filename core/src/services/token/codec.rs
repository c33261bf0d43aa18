//! HS256 token codec
//!
//! Stateless: the signing secret is captured once at construction and the
//! codec performs no I/O.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;

use crate::domain::entities::token::{Claims, TokenClaims, TokenKind};
use crate::errors::{AuthError, TokenError};

use super::config::TokenServiceConfig;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

/// Mints and verifies compact HS256 tokens
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec bound to `secret`
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared HS256 secret
    /// * `leeway_secs` - Clock-skew tolerance for `exp`
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &TokenServiceConfig) -> Self {
        Self::new(&config.jwt_secret, config.leeway_secs)
    }

    /// Mints a signed token for `subject`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact token
    /// * `Err(AuthError::Unexpected)` - Signing failed
    pub fn mint(
        &self,
        subject: &str,
        kind: TokenKind,
        lifetime: Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(subject, kind, lifetime);
        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            AuthError::Unexpected {
                message: format!("token signing failed: {}", e),
            }
        })
    }

    /// Verifies signature, algorithm and expiry, returning the typed claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if let Some(alg) = declared_algorithm(token) {
            if alg != "HS256" {
                return Err(TokenError::InvalidSignature);
            }
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        TokenClaims::try_from(data.claims)
    }

    /// Seconds until `exp`, zero once elapsed
    pub fn remaining_lifetime(claims: &TokenClaims) -> std::time::Duration {
        claims.remaining_lifetime()
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

// `none` and unknown algorithms do not parse as a jsonwebtoken header, so
// the declared algorithm is read from the raw segment first.
fn declared_algorithm(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice::<RawHeader>(&bytes).ok()?.alg
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    }
}
