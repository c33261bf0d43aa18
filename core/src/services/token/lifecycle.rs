//! Token lifecycle manager
//!
//! Refresh tokens move `ISSUED -> ROTATED -> EXPIRED`. Presenting a rotated
//! token is treated as compromise: the session is revoked and the caller
//! receives `TokenReuseDetected`.

use std::sync::Arc;
use std::time::Duration;

use constant_time_eq::constant_time_eq;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{TokenKind, TokenPair};
use crate::errors::{AuthError, TokenError};
use crate::repositories::SessionStore;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Issues, rotates, revokes and authorizes tokens against a session store
///
/// Holds no locks; per-key atomicity of the store is the only
/// synchronization. Share it behind an `Arc`.
pub struct TokenLifecycle<S: SessionStore> {
    store: Arc<S>,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<S: SessionStore> TokenLifecycle<S> {
    /// Creates a lifecycle manager over `store`
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> Self {
        Self {
            store,
            codec: TokenCodec::from_config(&config),
            config,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Mints a fresh pair for `subject` and records its refresh token
    ///
    /// Any earlier session of the subject is overwritten.
    pub async fn issue(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenPair, AuthError> {
        if subject.trim().is_empty() {
            return Err(AuthError::Unexpected {
                message: "cannot issue tokens for an empty subject".to_string(),
            });
        }

        let (scope, _guard) = self.scope(cancel);
        ensure_active(&scope)?;

        let pair = self.mint_pair(subject)?;

        ensure_active(&scope)?;
        self.store
            .put_session(subject, &pair.refresh_token, self.refresh_ttl(), &scope)
            .await?;

        info!(subject = %subject, "Issued token pair");
        Ok(pair)
    }

    /// Exchanges a current refresh token for a new pair
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Rotated pair; the presented token is blacklisted
    /// * `Err(AuthError::ExpiredToken)` - Presented token expired
    /// * `Err(AuthError::InvalidToken)` - Unverifiable or not a refresh token
    /// * `Err(AuthError::SessionNotFound)` - No live session for the subject
    /// * `Err(AuthError::TokenReuseDetected)` - Token was superseded; session revoked
    pub async fn refresh(
        &self,
        presented: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenPair, AuthError> {
        let (scope, _guard) = self.scope(cancel);
        ensure_active(&scope)?;

        let claims = self.codec.verify(presented).map_err(|e| match e {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::InvalidSignature | TokenError::Malformed => AuthError::InvalidToken,
        })?;
        if claims.kind != TokenKind::Refresh {
            debug!(kind = %claims.kind, "Rejected non-refresh token on refresh");
            return Err(AuthError::InvalidToken);
        }
        let subject = claims.subject.as_str();

        let stored = self
            .store
            .get_session(subject, &scope)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !constant_time_eq(stored.as_bytes(), presented.as_bytes()) {
            warn!(subject = %subject, "Refresh token reuse detected, revoking session");
            self.revoke_after_reuse(subject).await;
            return Err(AuthError::TokenReuseDetected);
        }

        ensure_active(&scope)?;
        let pair = self.mint_pair(subject)?;

        self.store
            .put_session(subject, &pair.refresh_token, self.refresh_ttl(), &scope)
            .await?;

        let residual = claims.remaining_lifetime();
        if let Err(e) = self.store.blacklist(presented, residual, &scope).await {
            warn!(subject = %subject, error = %e, "Failed to blacklist rotated refresh token");
        }

        info!(subject = %subject, "Rotated token pair");
        Ok(pair)
    }

    /// Blacklists `access_token` and deletes the session of `subject`
    ///
    /// Both steps always run; the first failure is returned afterwards.
    pub async fn logout(
        &self,
        subject: &str,
        access_token: &str,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError> {
        let (scope, _guard) = self.scope(cancel);
        ensure_active(&scope)?;

        let ttl = match self.codec.verify(access_token) {
            Ok(claims) => claims.remaining_lifetime(),
            Err(_) => self.access_ttl(),
        };

        let blacklisted = self.store.blacklist(access_token, ttl, &scope).await;
        if let Err(e) = &blacklisted {
            warn!(subject = %subject, error = %e, "Failed to blacklist access token on logout");
        }
        let deleted = self.store.delete_session(subject, &scope).await;

        blacklisted?;
        deleted?;

        info!(subject = %subject, "Logged out");
        Ok(())
    }

    /// Resolves an access token to its subject
    ///
    /// Blacklisted, unverifiable or non-access tokens yield `Unauthorized`;
    /// store faults surface as `StoreUnavailable` or `Cancelled`.
    pub async fn authorize(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<String, AuthError> {
        let (scope, _guard) = self.scope(cancel);
        ensure_active(&scope)?;

        if self.store.is_blacklisted(token, &scope).await? {
            debug!("Rejected blacklisted token");
            return Err(AuthError::Unauthorized);
        }

        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected unverifiable token");
            AuthError::Unauthorized
        })?;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::Unauthorized);
        }

        Ok(claims.subject)
    }

    /// Deletes the session of `subject` under its own timeout budget
    ///
    /// Revocation must not be skipped because the refresh that detected the
    /// reuse was cancelled or ran out of time.
    async fn revoke_after_reuse(&self, subject: &str) {
        let (scope, _guard) = self.scope(&CancellationToken::new());
        if let Err(e) = self.store.delete_session(subject, &scope).await {
            warn!(subject = %subject, error = %e, "Failed to revoke session after reuse");
        }
    }

    fn mint_pair(&self, subject: &str) -> Result<TokenPair, AuthError> {
        let access = self
            .codec
            .mint(subject, TokenKind::Access, self.config.access_lifetime())?;
        let refresh = self
            .codec
            .mint(subject, TokenKind::Refresh, self.config.refresh_lifetime())?;

        Ok(TokenPair::new(
            access,
            refresh,
            self.config.access_token_expiry_secs,
            self.config.refresh_token_expiry_secs,
        ))
    }

    fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.config.access_token_expiry_secs.max(0) as u64)
    }

    fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.config.refresh_token_expiry_secs.max(0) as u64)
    }

    /// Child token for one operation, cancelled by the configured timeout
    /// and when the returned guard drops
    fn scope(&self, cancel: &CancellationToken) -> (CancellationToken, DropGuard) {
        let scope = cancel.child_token();

        if let Some(limit) = self.config.operation_timeout {
            let timer = scope.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => timer.cancel(),
                    _ = timer.cancelled() => {}
                }
            });
        }

        let guard = scope.clone().drop_guard();
        (scope, guard)
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), AuthError> {
    if cancel.is_cancelled() {
        Err(AuthError::Cancelled)
    } else {
        Ok(())
    }
}
