//! Redis cache client implementation
//!
//! Provides a Redis client with connection retry, per-operation retry with
//! exponential backoff, and key prefixing. Keys may embed token values, so
//! they are redacted before logging.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::CacheConfig;
use crate::InfrastructureError;

/// Upper bound for the retry backoff
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Counter value and remaining window after an atomic increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    pub count: u64,
    pub ttl_seconds: u64,
}

/// Redis client with connection retry and operation retry logic
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client, retrying the initial connection
    ///
    /// # Example
    /// ```no_run
    /// use gk_infra::config::CacheConfig;
    /// use gk_infra::cache::RedisClient;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379").with_prefix("gk");
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(&client, &config).await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_attempts = config.max_retries.max(1);
        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let error = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await
            {
                Ok(Ok(connection)) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Ok(Err(e)) => InfrastructureError::Cache(e),
                Err(_) => InfrastructureError::Timeout(format!(
                    "Redis connection not established within {}s",
                    connect_timeout.as_secs()
                )),
            };

            if attempts >= max_attempts {
                error!("Failed to connect to Redis after {} attempts: {}", attempts, error);
                return Err(error);
            }

            warn!(
                "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                attempts, max_attempts, error, delay
            );
            sleep(Duration::from_millis(delay)).await;
            delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
        }
    }

    /// Configuration used to create this client
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Set a value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = self.config.make_key(key);
        debug!("Setting key '{}' with expiry {}s", redact_key(&key), expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            let value = value.to_string();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", redact_key(&key), e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value, `None` when absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.config.make_key(key);
        debug!("Getting key '{}'", redact_key(&key));

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", redact_key(&key), e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.config.make_key(key);
        debug!("Deleting key '{}'", redact_key(&key));

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.del::<_, u32>(key).await })
        })
        .await
        .map(|deleted| deleted > 0)
        .map_err(|e| {
            error!("Failed to delete key '{}': {}", redact_key(&key), e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.config.make_key(key);
        debug!("Checking if key '{}' exists", redact_key(&key));

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to check key '{}': {}", redact_key(&key), e);
            InfrastructureError::Cache(e)
        })
    }

    /// Time-to-live of a key, `None` if absent or without expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>, InfrastructureError> {
        let key = self.config.make_key(key);

        let ttl = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to get TTL for key '{}': {}", redact_key(&key), e);
                InfrastructureError::Cache(e)
            })?;

        Ok(u64::try_from(ttl).ok())
    }

    /// Increment a counter, starting a window of `window_seconds` when the
    /// key is created
    ///
    /// Runs `SET key 0 EX w NX; INCR key; TTL key` in one MULTI/EXEC so the
    /// expiry is attached atomically with the first increment.
    pub async fn increment_in_window(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<WindowCount, InfrastructureError> {
        let key = self.config.make_key(key);
        let window_seconds = window_seconds.max(1);

        let (count, ttl) = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::pipe()
                        .atomic()
                        .cmd("SET")
                        .arg(&key)
                        .arg(0)
                        .arg("EX")
                        .arg(window_seconds)
                        .arg("NX")
                        .ignore()
                        .cmd("INCR")
                        .arg(&key)
                        .cmd("TTL")
                        .arg(&key)
                        .query_async::<_, (i64, i64)>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| {
                error!("Failed to increment counter '{}': {}", redact_key(&key), e);
                InfrastructureError::Cache(e)
            })?;

        debug!("Counter '{}' incremented to {}", redact_key(&key), count);

        Ok(WindowCount {
            count: u64::try_from(count).unwrap_or(0),
            ttl_seconds: u64::try_from(ttl).unwrap_or(window_seconds),
        })
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Execute a Redis operation with retry and exponential backoff
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_attempts && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Check if a Redis error is transient and worth retrying
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}

/// Keep a key's namespace, hide its identifier
pub(crate) fn redact_key(key: &str) -> String {
    match key.rfind(':') {
        Some(pos) => format!("{}<{} bytes>", &key[..=pos], key.len() - pos - 1),
        None => format!("<{} bytes>", key.len()),
    }
}
