//! Session-scoped storage for the token secret handed from the request token
//! step to the access token step.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

/// Key under which the request token secret is stashed.
pub const SESSION_KEY_TOKEN_SECRET: &str = "oauth_token_secret";

/// Key/value store addressed by session id. Entries of one session are never
/// visible to another.
pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str, key: &str) -> Option<SecretString>;

    fn put(&self, session_id: &str, key: &str, value: SecretString);

    /// Removes and returns the entry.
    fn take(&self, session_id: &str, key: &str) -> Option<SecretString>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<(String, String), SecretString>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), SecretString>> {
        // a poisoned map is still consistent: every operation is a single call
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str, key: &str) -> Option<SecretString> {
        self.lock()
            .get(&(session_id.to_string(), key.to_string()))
            .cloned()
    }

    fn put(&self, session_id: &str, key: &str, value: SecretString) {
        self.lock()
            .insert((session_id.to_string(), key.to_string()), value);
    }

    fn take(&self, session_id: &str, key: &str) -> Option<SecretString> {
        self.lock()
            .remove(&(session_id.to_string(), key.to_string()))
    }
}

/// One end user's handshake: the session id plus the store holding its state.
/// Owned by the caller and passed to each handshake step.
#[derive(Clone)]
pub struct HandshakeContext {
    session_id: String,
    store: Arc<dyn SessionStore>,
}

impl HandshakeContext {
    pub fn new(session_id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        HandshakeContext {
            session_id: session_id.into(),
            store,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn token_secret(&self) -> Option<SecretString> {
        self.store.get(&self.session_id, SESSION_KEY_TOKEN_SECRET)
    }

    pub(crate) fn stash_token_secret(&self, secret: SecretString) {
        self.store
            .put(&self.session_id, SESSION_KEY_TOKEN_SECRET, secret);
    }

    pub(crate) fn take_token_secret(&self) -> Option<SecretString> {
        self.store.take(&self.session_id, SESSION_KEY_TOKEN_SECRET)
    }
}

impl fmt::Debug for HandshakeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeContext")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn exposed(secret: Option<SecretString>) -> Option<String> {
        secret.map(|s| s.expose_secret().clone())
    }

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = Arc::new(InMemorySessionStore::new());
        let alice = HandshakeContext::new("alice", store.clone());
        let bob = HandshakeContext::new("bob", store.clone());

        alice.stash_token_secret(secret("a-secret"));
        assert_eq!(exposed(alice.token_secret()).as_deref(), Some("a-secret"));
        assert!(bob.token_secret().is_none());
        assert!(bob.take_token_secret().is_none());

        bob.stash_token_secret(secret("b-secret"));
        assert_eq!(store.len(), 2);

        assert_eq!(exposed(alice.take_token_secret()).as_deref(), Some("a-secret"));
        assert!(alice.take_token_secret().is_none());
        assert_eq!(exposed(bob.token_secret()).as_deref(), Some("b-secret"));
    }

    #[test]
    fn test_put_overwrites() {
        let store = InMemorySessionStore::new();
        store.put("s", "k", secret("1"));
        store.put("s", "k", secret("2"));
        assert_eq!(exposed(store.get("s", "k")).as_deref(), Some("2"));
        assert_eq!(exposed(store.take("s", "k")).as_deref(), Some("2"));
        assert!(store.is_empty());
    }
}
