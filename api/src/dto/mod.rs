pub mod auth;

pub use auth::{
    LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse, UserResponse,
    VerifyResponse,
};
