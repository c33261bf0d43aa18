//! In-memory session store with per-key TTL
//!
//! Suitable for tests and single-process deployments. Reads evaluate expiry
//! against `tokio::time::Instant`, so paused test time drives it, and every
//! write sweeps out entries whose TTL has elapsed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;

use super::r#trait::SessionStore;
use super::{blacklist_key, session_key, ttl_seconds};

const BLACKLIST_MARKER: &str = "1";

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Session store backed by a process-local map
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    async fn set(&self, key: String, value: &str, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now + Duration::from_secs(ttl_seconds(ttl));
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key,
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    async fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    async fn remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at - now)
    }

    /// Remaining TTL of the session record of `subject`
    pub async fn session_ttl(&self, subject: &str) -> Option<Duration> {
        self.remaining(&session_key(subject)).await
    }

    /// Remaining TTL of the blacklist marker of `token`
    pub async fn blacklist_ttl(&self, token: &str) -> Option<Duration> {
        self.remaining(&blacklist_key(token)).await
    }

    /// Drop entries whose TTL has elapsed, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), StoreError> {
    if cancel.is_cancelled() {
        Err(StoreError::Cancelled)
    } else {
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put_session(
        &self,
        subject: &str,
        token: &str,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        ensure_active(cancel)?;
        self.set(session_key(subject), token, ttl).await;
        Ok(())
    }

    async fn get_session(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, StoreError> {
        ensure_active(cancel)?;
        Ok(self.live_value(&session_key(subject)).await)
    }

    async fn delete_session(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        ensure_active(cancel)?;
        self.entries.write().await.remove(&session_key(subject));
        Ok(())
    }

    async fn blacklist(
        &self,
        token: &str,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        ensure_active(cancel)?;
        self.set(blacklist_key(token), BLACKLIST_MARKER, ttl).await;
        Ok(())
    }

    async fn is_blacklisted(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError> {
        ensure_active(cancel)?;
        Ok(self.live_value(&blacklist_key(token)).await.is_some())
    }
}
