//! Session state store contract consumed by the token lifecycle manager.

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;

/// Ephemeral keyed store holding session records and the token blacklist
///
/// Every operation is individually atomic; no multi-key transaction is
/// offered. Every operation observes `cancel` and returns
/// `StoreError::Cancelled` without applying its write once it fires.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `token` as the current refresh token of `subject`
    ///
    /// Replaces any existing record (last writer wins).
    async fn put_session(
        &self,
        subject: &str,
        token: &str,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError>;

    /// Current refresh token of `subject`, `None` when absent or expired
    async fn get_session(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, StoreError>;

    /// Remove the session record of `subject`; absent records are not an error
    async fn delete_session(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError>;

    /// Deny `token` for `ttl`; blacklisting twice is a no-op success
    async fn blacklist(
        &self,
        token: &str,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError>;

    /// Whether `token` currently carries a blacklist marker
    async fn is_blacklisted(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError>;
}
