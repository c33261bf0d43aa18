//! Unit tests for domain error types

use crate::errors::{AuthError, DomainError, StoreError, TokenError, ValidationError};

#[test]
fn test_token_error_maps_to_auth_error() {
    assert_eq!(AuthError::from(TokenError::Expired), AuthError::ExpiredToken);
    assert_eq!(AuthError::from(TokenError::InvalidSignature), AuthError::InvalidToken);
    assert_eq!(AuthError::from(TokenError::Malformed), AuthError::InvalidToken);
}

#[test]
fn test_store_error_maps_to_transient_auth_error() {
    let error: DomainError = StoreError::unavailable("connection refused").into();
    assert!(error.is_transient());
    match error {
        DomainError::Auth(AuthError::StoreUnavailable { message }) => {
            assert_eq!(message, "connection refused");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let cancelled: DomainError = StoreError::Cancelled.into();
    assert!(matches!(cancelled, DomainError::Auth(AuthError::Cancelled)));
    assert!(cancelled.is_transient());
}

#[test]
fn test_credential_and_token_errors_are_not_transient() {
    assert!(!AuthError::InvalidCredentials.is_transient());
    assert!(!AuthError::TokenReuseDetected.is_transient());
    assert!(!DomainError::from(ValidationError::InvalidEmail).is_transient());
}

#[test]
fn test_credential_error_message_does_not_leak_cause() {
    let message = AuthError::InvalidCredentials.to_string();
    assert_eq!(message, "Invalid credentials");
}

#[test]
fn test_validation_error_messages() {
    let error = ValidationError::PasswordTooShort { min: 8 };
    assert!(error.to_string().contains('8'));

    let error = ValidationError::RequiredField {
        field: "email".to_string(),
    };
    assert!(error.to_string().contains("email"));
}
