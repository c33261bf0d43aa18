//! Per-client fixed-window rate limiting middleware
//!
//! Requests are counted per peer IP address. Once the window's budget is spent
//! the middleware answers `429 Too Many Requests` with a `Retry-After` header
//! until the window closes. A failing counter store lets traffic through.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderName, HeaderValue},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use gk_core::services::{RateLimitDecision, RateLimiter};
use gk_shared::errors::{error_codes, ErrorResponse};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::warn;

const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Identifier used when the peer address is unknown
const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limiter middleware factory
///
/// Built without a limiter it passes every request through.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl RateLimit {
    pub fn new(limiter: Option<Arc<dyn RateLimiter>>) -> Self {
        Self { limiter }
    }

    pub fn disabled() -> Self {
        Self { limiter: None }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        Box::pin(async move {
            let limiter = match limiter {
                Some(limiter) => limiter,
                None => return service.call(req).await.map(|res| res.map_into_left_body()),
            };

            let client = client_identifier(&req);
            let decision = match limiter.hit(&client).await {
                Ok(decision) => decision,
                Err(error) => {
                    warn!(error = %error, "Rate limiter unavailable, allowing request");
                    return service.call(req).await.map(|res| res.map_into_left_body());
                }
            };

            if !decision.allowed {
                warn!(client = %client, count = decision.count, "Rate limit exceeded");
                let response = too_many_requests(&decision);
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static(X_RATELIMIT_LIMIT),
                HeaderValue::from(decision.limit),
            );
            headers.insert(
                HeaderName::from_static(X_RATELIMIT_REMAINING),
                HeaderValue::from(decision.remaining()),
            );
            Ok(res.map_into_left_body())
        })
    }
}

/// Peer IP address of the request, ignoring forwarding headers a client could forge
fn client_identifier(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn too_many_requests(decision: &RateLimitDecision) -> HttpResponse {
    let retry_after = retry_after_seconds(decision);
    HttpResponse::TooManyRequests()
        .insert_header((header::RETRY_AFTER, retry_after))
        .insert_header((X_RATELIMIT_LIMIT, decision.limit))
        .insert_header((X_RATELIMIT_REMAINING, 0u64))
        .json(
            ErrorResponse::new(error_codes::RATE_LIMIT_EXCEEDED, "Too many requests")
                .add_detail("retry_after_seconds", retry_after),
        )
}

/// Whole seconds until the window closes, never less than one
fn retry_after_seconds(decision: &RateLimitDecision) -> u64 {
    let reset = decision.reset_after;
    let seconds = reset.as_secs() + u64::from(reset.subsec_nanos() > 0);
    seconds.max(1)
}
