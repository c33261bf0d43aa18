//! Bearer token authentication middleware for protected endpoints.
//!
//! The middleware extracts the access token from the `Authorization` header,
//! resolves it to a subject through the token lifecycle manager (blacklist,
//! signature, expiry and kind checks) and injects an [`AuthContext`] into the
//! request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use gk_core::errors::AuthError;
use gk_core::repositories::SessionStore;
use gk_core::services::TokenLifecycle;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tokio_util::sync::CancellationToken;

use crate::handlers::error::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject resolved from the access token
    pub subject: String,
    /// The presented access token, needed to revoke it on logout
    pub access_token: String,
}

/// Resolves an access token to the subject it was issued for
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    async fn verify_access_token(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<String, AuthError>;
}

#[async_trait]
impl<S: SessionStore + 'static> AccessTokenVerifier for TokenLifecycle<S> {
    async fn verify_access_token(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<String, AuthError> {
        self.authorize(token, cancel).await
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    verifier: Arc<dyn AccessTokenVerifier>,
}

impl JwtAuth {
    /// Creates a new authentication middleware backed by `verifier`
    pub fn new(verifier: Arc<dyn AccessTokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn AccessTokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
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
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Ok(reject(req, AuthError::Unauthorized)),
            };

            let cancel = CancellationToken::new();
            let subject = match verifier.verify_access_token(&token, &cancel).await {
                Ok(subject) => subject,
                Err(error) => return Ok(reject(req, error)),
            };

            req.extensions_mut().insert(AuthContext {
                subject,
                access_token: token,
            });

            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, error: AuthError) -> ServiceResponse<EitherBody<B>> {
    let response = actix_web::ResponseError::error_response(&ApiError::from(error));
    req.into_response(response).map_into_right_body()
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::from(AuthError::Unauthorized).into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;

    #[test]
    fn test_extract_bearer_token() {
        let req = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = actix_test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
