use actix_web::HttpResponse;

use crate::dto::auth::VerifyResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/verify
///
/// Resolves the presented access token to its subject. `JwtAuth` has already
/// rejected blacklisted, expired and refresh tokens, so this only reports who
/// the caller is.
///
/// - 200 OK: `{"user_id": "<subject>"}`
/// - 401 Unauthorized without a valid access token
pub async fn verify(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(VerifyResponse {
        user_id: auth.subject,
    })
}
