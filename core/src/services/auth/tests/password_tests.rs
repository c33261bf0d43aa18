use crate::services::auth::{BcryptPasswordHasher, PasswordHasher};

#[test]
fn test_bcrypt_hash_and_verify() {
    let hasher = BcryptPasswordHasher::new(4);
    let hash = hasher.hash("correct horse").unwrap();

    assert_ne!(hash, "correct horse");
    assert!(hasher.verify("correct horse", &hash).unwrap());
    assert!(!hasher.verify("battery staple", &hash).unwrap());
}

#[test]
fn test_bcrypt_salts_each_hash() {
    let hasher = BcryptPasswordHasher::new(4);
    let a = hasher.hash("password123").unwrap();
    let b = hasher.hash("password123").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_unreadable_hash_is_mismatch() {
    let hasher = BcryptPasswordHasher::default();
    assert!(!hasher.verify("password123", "not-a-bcrypt-hash").unwrap());
}
