//! Password hashing behind a trait so the service never depends on bcrypt directly

use tracing::warn;

use crate::errors::AuthError;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check `password` against a stored hash
    ///
    /// Unparseable hashes are reported as a mismatch.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// bcrypt-backed hasher
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::Unexpected {
            message: format!("password hashing failed: {}", e),
        })
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash).or_else(|e| {
            warn!(error = %e, "Stored password hash is unreadable");
            Ok(false)
        })
    }
}
