use actix_web::{web, HttpResponse};
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::PasswordHasher;
use validator::Validate;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is retired;
/// presenting it again revokes the whole session.
///
/// # Request Body
///
/// ```json
/// { "refresh_token": "eyJ..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing refresh token
/// - 401 Unauthorized: invalid, expired, superseded or revoked token
/// - 503 Service Unavailable: session store unreachable
pub async fn refresh<U, S, H>(
    state: web::Data<AppState<U, S, H>>,
    request: web::Json<RefreshTokenRequest>,
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
        .refresh(&request.refresh_token, &cancel)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
