//! Unit tests for token entities

use chrono::{Duration, Utc};

use crate::domain::entities::token::{Claims, TokenClaims, TokenKind, TokenPair, TOKEN_TYPE_BEARER};
use crate::errors::TokenError;

#[test]
fn test_claims_carry_kind_and_expiry() {
    let claims = Claims::new("user-1", TokenKind::Access, Duration::minutes(15));

    assert_eq!(claims.sub, "user-1");
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
    assert!(!claims.jti.is_empty());
}

#[test]
fn test_claims_minted_together_are_distinct() {
    let first = Claims::new("user-1", TokenKind::Refresh, Duration::days(7));
    let second = Claims::new("user-1", TokenKind::Refresh, Duration::days(7));
    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_kind_serializes_lowercase() {
    assert_eq!(serde_json::to_value(TokenKind::Refresh).unwrap(), "refresh");
    assert_eq!(TokenKind::Access.to_string(), "access");
}

#[test]
fn test_typed_claims_from_wire_claims() {
    let claims = Claims::new("user-1", TokenKind::Refresh, Duration::hours(1));
    let typed = TokenClaims::try_from(claims.clone()).unwrap();

    assert_eq!(typed.subject, "user-1");
    assert_eq!(typed.kind, TokenKind::Refresh);
    assert_eq!(typed.expires_at.timestamp(), claims.exp);
    assert!(!typed.is_expired());
    assert!(typed.remaining_lifetime() > std::time::Duration::from_secs(3500));
}

#[test]
fn test_empty_subject_is_malformed() {
    let mut claims = Claims::new("user-1", TokenKind::Access, Duration::minutes(1));
    claims.sub = "  ".to_string();
    assert_eq!(TokenClaims::try_from(claims), Err(TokenError::Malformed));
}

#[test]
fn test_remaining_lifetime_floors_at_zero() {
    let typed = TokenClaims {
        subject: "user-1".to_string(),
        kind: TokenKind::Access,
        issued_at: Utc::now() - Duration::hours(2),
        expires_at: Utc::now() - Duration::hours(1),
    };
    assert!(typed.is_expired());
    assert_eq!(typed.remaining_lifetime(), std::time::Duration::ZERO);
}

#[test]
fn test_token_pair_is_bearer() {
    let pair = TokenPair::new("a".to_string(), "r".to_string(), 900, 604800);
    assert_eq!(pair.token_type, TOKEN_TYPE_BEARER);
    assert_eq!(pair.expires_in, 900);
}
