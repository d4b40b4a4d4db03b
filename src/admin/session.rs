//! Admin session state and token validation.
//!
//! # Design Decisions
//! - Sessions map an opaque id (uuid v4, carried in a cookie) to a token
//! - Storage and validation are traits so the dispatcher stays pure
//! - Tokens are compared in constant time

use dashmap::DashMap;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Per-session token storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str) -> Option<String>;
    fn set(&self, session_id: &str, token: String);
    fn clear(&self, session_id: &str);
}

/// Decides whether a token grants admin access.
pub trait TokenValidator: Send + Sync {
    fn is_valid(&self, token: &str) -> bool;
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session_id: &str) -> Option<String> {
        self.sessions.get(session_id).map(|t| t.value().clone())
    }

    fn set(&self, session_id: &str, token: String) {
        self.sessions.insert(session_id.to_string(), token);
    }

    fn clear(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }
}

/// Accepts the tokens listed in configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigTokenValidator {
    tokens: Vec<String>,
}

impl ConfigTokenValidator {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

impl TokenValidator for ConfigTokenValidator {
    fn is_valid(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        // Every configured token is compared.
        self.tokens
            .iter()
            .fold(false, |found, t| constant_time_eq(t, token) | found)
    }
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.get("s1").is_none());
        store.set("s1", "tok".into());
        assert_eq!(store.get("s1").as_deref(), Some("tok"));
        store.clear("s1");
        assert!(store.is_empty());
    }

    #[test]
    fn test_token_validator() {
        let validator = ConfigTokenValidator::new(vec!["alpha".into(), "beta".into()]);
        assert!(validator.is_valid("beta"));
        assert!(!validator.is_valid("bet"));
        assert!(!validator.is_valid(""));
        assert!(!ConfigTokenValidator::default().is_valid("alpha"));
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(new_session_id(), new_session_id());
    }
}
