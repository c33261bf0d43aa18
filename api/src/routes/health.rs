//! Health check endpoint and the dependency probes it reports on

use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::PasswordHasher;
use gk_infra::{DatabasePool, RedisClient};
use serde_json::{Map, Value};
use tracing::warn;

use crate::app::AppState;

/// A backing service whose reachability is reported by `/health`
#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl HealthProbe for RedisClient {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn is_healthy(&self) -> bool {
        match self.health_check().await {
            Ok(healthy) => healthy,
            Err(error) => {
                warn!(error = %error, "Redis health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl HealthProbe for DatabasePool {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn is_healthy(&self) -> bool {
        match self.health_check().await {
            Ok(healthy) => healthy,
            Err(error) => {
                warn!(error = %error, "Database health check failed");
                false
            }
        }
    }
}

/// Handler for GET /health
///
/// 200 when every probe answers, 503 otherwise. The body lists each probe.
pub async fn health_check<U, S, H>(state: web::Data<AppState<U, S, H>>) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    let mut checks = Map::new();
    let mut healthy = true;
    for probe in &state.health_probes {
        let up = probe.is_healthy().await;
        healthy &= up;
        checks.insert(
            probe.name().to_string(),
            Value::from(if up { "up" } else { "down" }),
        );
    }

    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "gatekeep-api",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": checks,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
