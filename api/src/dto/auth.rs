use chrono::{DateTime, Utc};
use gk_core::domain::{TokenPair, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Missing fields deserialize as empty strings and fail validation, so the
/// caller gets a per-field error instead of a body parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email, length(min = 3, max = 254))]
    pub email: String,

    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

/// Subject an access token resolves to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            refresh_expires_in: pair.refresh_expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: LoginRequest = serde_json::from_str(r#"{"email":"a@example.com"}"#).unwrap();
        assert_eq!(request.email, "a@example.com");
        assert!(request.password.is_empty());

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(!errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_request_rules() {
        let valid = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short = RegisterRequest {
            password: "short".to_string(),
            ..valid.clone()
        };
        assert!(short.validate().unwrap_err().field_errors().contains_key("password"));

        let malformed = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid
        };
        assert!(malformed.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_refresh_request_requires_token() {
        assert!(RefreshTokenRequest::default().validate().is_err());
        let request = RefreshTokenRequest {
            refresh_token: "eyJ.x.y".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User::new("a@example.com", "$2b$04$hash");
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["is_active"], true);
    }
}
