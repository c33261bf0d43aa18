//! Database module - MySQL implementations using SQLx
//!
//! This module provides the credential store:
//! - Connection pool management with startup retries
//! - Embedded migrations for the `users` table
//! - The MySQL `UserRepository` implementation

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlUserRepository;
