//! Redis-backed session state store

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use gk_core::errors::StoreError;
use gk_core::repositories::session::{blacklist_key, session_key, ttl_seconds};
use gk_core::repositories::SessionStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

const BLACKLIST_MARKER: &str = "1";

/// Session store keeping records under `refresh:<subject>` and
/// `blacklist:<token>`, both under the client's key prefix
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

/// Race a Redis call against cancellation
///
/// A command already written to the connection may still be applied by the
/// server; no further commands are issued once cancelled.
async fn guarded<T, F>(cancel: &CancellationToken, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, InfrastructureError>>,
{
    if cancel.is_cancelled() {
        return Err(StoreError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StoreError::Cancelled),
        result = operation => result.map_err(StoreError::from),
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put_session(
        &self,
        subject: &str,
        token: &str,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        debug!(subject = %subject, "Storing session record");
        guarded(
            cancel,
            self.client
                .set_with_expiry(&session_key(subject), token, ttl_seconds(ttl)),
        )
        .await
    }

    async fn get_session(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, StoreError> {
        guarded(cancel, self.client.get(&session_key(subject))).await
    }

    async fn delete_session(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        debug!(subject = %subject, "Deleting session record");
        guarded(cancel, self.client.delete(&session_key(subject)))
            .await
            .map(|_| ())
    }

    async fn blacklist(
        &self,
        token: &str,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        guarded(
            cancel,
            self.client
                .set_with_expiry(&blacklist_key(token), BLACKLIST_MARKER, ttl_seconds(ttl)),
        )
        .await
    }

    async fn is_blacklisted(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError> {
        guarded(cancel, self.client.exists(&blacklist_key(token))).await
    }
}
