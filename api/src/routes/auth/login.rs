use actix_web::{web, HttpResponse};
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::PasswordHasher;
use validator::Validate;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/auth/login
///
/// Verifies the credentials and issues a fresh token pair. Any refresh token
/// issued earlier to the same user stops working.
///
/// # Response
///
/// - 200 OK: `{access_token, refresh_token, token_type, expires_in, refresh_expires_in}`
/// - 400 Bad Request: malformed email or missing password
/// - 401 Unauthorized: unknown email or wrong password
/// - 503 Service Unavailable: session store unreachable
pub async fn login<U, S, H>(
    state: web::Data<AppState<U, S, H>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let cancel = CancellationToken::new();
    match state
        .auth_service
        .login(&request.email, &request.password, &cancel)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
