//! HTTP surface of the Gatekeep service
//!
//! Exposes registration, login, token rotation, logout and identity lookup
//! under `/api/v1`, plus a `/health` probe endpoint.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
pub use handlers::error::{handle_domain_error, ApiError};
pub use routes::health::HealthProbe;
