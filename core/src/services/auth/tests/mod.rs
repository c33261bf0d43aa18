//! Tests for authentication service

mod password_tests;
mod rate_limiter_tests;
