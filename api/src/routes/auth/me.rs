use actix_web::{web, HttpResponse};
use gk_core::repositories::{SessionStore, UserRepository};
use gk_core::services::PasswordHasher;

use crate::app::AppState;
use crate::dto::auth::UserResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me
///
/// Returns the user the presented access token was issued for.
pub async fn me<U, S, H>(state: web::Data<AppState<U, S, H>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
    H: PasswordHasher + 'static,
{
    match state.auth_service.get_user(&auth.subject).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(error) => handle_domain_error(error),
    }
}
