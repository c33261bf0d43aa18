//! Main authentication service implementation

use std::sync::Arc;

use gk_shared::validation::{is_email_valid, is_password_long_enough, normalize_email};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{SessionStore, UserRepository};
use crate::services::token::TokenLifecycle;

use super::config::AuthServiceConfig;
use super::password::PasswordHasher;

/// Plaintext of the hash checked when no account matches a login
const DECOY_PASSWORD: &str = "gatekeep-decoy-password";

/// Authentication service composing the credential store, the password
/// hasher and the token lifecycle manager
pub struct AuthService<U, S, H>
where
    U: UserRepository,
    S: SessionStore,
    H: PasswordHasher + 'static,
{
    /// Credential store
    user_repository: Arc<U>,
    /// One-way password hashing
    password_hasher: Arc<H>,
    /// Token issuance and rotation
    tokens: Arc<TokenLifecycle<S>>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Hash verified in place of a missing or inactive account's, built on first use
    decoy_hash: OnceCell<String>,
}

impl<U, S, H> AuthService<U, S, H>
where
    U: UserRepository,
    S: SessionStore,
    H: PasswordHasher + 'static,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Credential store
    /// * `password_hasher` - Hasher used for registration and login
    /// * `tokens` - Token lifecycle manager
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        password_hasher: Arc<H>,
        tokens: Arc<TokenLifecycle<S>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            tokens,
            config,
            decoy_hash: OnceCell::new(),
        }
    }

    pub fn tokens(&self) -> &Arc<TokenLifecycle<S>> {
        &self.tokens
    }

    /// Register a new user
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Validation)` - Email or password rejected
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Email taken
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);
        self.validate_registration(&email, password)?;

        if self.user_repository.exists_by_email(&email).await? {
            debug!("Registration rejected for existing email");
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .user_repository
            .create(User::new(email, password_hash))
            .await?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Verify credentials and issue a token pair
    ///
    /// Unknown email, inactive account and wrong password are all reported as
    /// `InvalidCredentials`, and each of them costs one password verification.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> DomainResult<TokenPair> {
        let email = normalize_email(email);
        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            other => {
                if let Some(user) = other {
                    debug!(user_id = %user.id, "Login rejected for inactive user");
                }
                let decoy = self.decoy_hash().await?;
                self.verify_password(password, decoy).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.verify_password(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "Login rejected for wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(self.tokens.issue(&user.subject(), cancel).await?)
    }

    /// Exchange a refresh token for a new pair
    pub async fn refresh(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> DomainResult<TokenPair> {
        Ok(self.tokens.refresh(refresh_token, cancel).await?)
    }

    /// Revoke the access token and session of `subject`
    pub async fn logout(
        &self,
        subject: &str,
        access_token: &str,
        cancel: &CancellationToken,
    ) -> DomainResult<()> {
        Ok(self.tokens.logout(subject, access_token, cancel).await?)
    }

    /// Resolve an access token to its subject
    pub async fn authorize(&self, token: &str, cancel: &CancellationToken) -> DomainResult<String> {
        Ok(self.tokens.authorize(token, cancel).await?)
    }

    /// Fetch the user identified by `subject`
    pub async fn get_user(&self, subject: &str) -> DomainResult<User> {
        let not_found = || DomainError::NotFound {
            resource: "User".to_string(),
        };

        let id = Uuid::parse_str(subject).map_err(|_| not_found())?;
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    fn validate_registration(&self, email: &str, password: &str) -> Result<(), ValidationError> {
        require("email", email)?;
        require("password", password)?;

        if !is_email_valid(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_password_long_enough(password, self.config.min_password_length) {
            return Err(ValidationError::PasswordTooShort {
                min: self.config.min_password_length,
            });
        }
        Ok(())
    }

    async fn decoy_hash(&self) -> Result<&str, AuthError> {
        self.decoy_hash
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD))
            .await
            .map(String::as_str)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Unexpected {
                message: format!("password hashing task failed: {}", e),
            })?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Unexpected {
                message: format!("password verification task failed: {}", e),
            })?
    }
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::RequiredField {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}
