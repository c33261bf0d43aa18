use actix_web::{web, HttpResponse};
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::PasswordHasher;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/logout
///
/// Requires `Authorization: Bearer <access token>`. Blacklists the presented
/// access token for its remaining lifetime and deletes the caller's session.
///
/// - 204 No Content on success
/// - 401 Unauthorized without a valid access token
/// - 503 Service Unavailable when revocation could not be recorded
pub async fn logout<U, S, H>(
    state: web::Data<AppState<U, S, H>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    let cancel = CancellationToken::new();
    match state
        .auth_service
        .logout(&auth.subject, &auth.access_token, &cancel)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(error),
    }
}
