//! User entity as held by the credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered user identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, used as the token subject
    pub id: Uuid,

    /// Unique, normalized email address
    pub email: String,

    /// One-way password hash; never serialized outward
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Deactivated users cannot log in
    pub is_active: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Token subject for this user
    pub fn subject(&self) -> String {
        self.id.to_string()
    }

    /// Marks the user as deactivated
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
