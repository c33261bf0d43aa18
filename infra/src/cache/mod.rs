//! Cache module for Redis-backed session state
//!
//! This module provides the Redis client (connection management, retry
//! logic, key prefixing) and the session state store built on it.

pub mod redis_client;
pub mod session_store;


pub use redis_client::{RedisClient, WindowCount};
pub use session_store::RedisSessionStore;

// Re-export commonly used types
pub use gk_shared::config::CacheConfig;
