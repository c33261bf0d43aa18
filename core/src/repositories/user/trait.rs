//! User repository trait defining the interface for credential persistence.
//!
//! Emails are stored normalized (trimmed, lowercased); callers normalize
//! before lookups.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use gk_core::repositories::UserRepository;
/// use gk_core::domain::entities::user::User;
/// use gk_core::errors::DomainError;
///
/// struct PostgresUserRepository;
///
/// #[async_trait]
/// impl UserRepository for PostgresUserRepository {
///     async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn create(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalized email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with this email
    /// * `Err(DomainError)` - Storage fault
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    ///
    /// Fails with `AuthError::UserAlreadyExists` when the email is taken.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Check whether an email is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
