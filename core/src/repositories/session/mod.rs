pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::InMemorySessionStore;
pub use r#trait::SessionStore;


use std::time::Duration;

/// Namespace for the current refresh token of each subject
pub const SESSION_KEY_PREFIX: &str = "refresh:";

/// Namespace for revoked and rotated tokens
pub const BLACKLIST_KEY_PREFIX: &str = "blacklist:";

/// Key holding the session record of `subject`
pub fn session_key(subject: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, subject)
}

/// Key holding the blacklist marker of `token`
pub fn blacklist_key(token: &str) -> String {
    format!("{}{}", BLACKLIST_KEY_PREFIX, token)
}

/// Whole seconds for a store TTL, rounded up and never below one second
pub fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}
