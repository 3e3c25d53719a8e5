//! Shared session state and its persistence.
//!
//! One `SessionStore` exists per process context and is shared via `Arc`;
//! every reader observes the latest write. Mutations are last-write-wins
//! under a single lock — concurrent operations (a double-submitted login)
//! are not sequenced beyond that.

use crate::storage::StateStorage;
use parking_lot::RwLock;
use std::sync::Arc;

/// Storage key for the persisted bearer token.
pub(crate) const AUTH_TOKEN_KEY: &str = "auth_token";

/// Snapshot of the session fields.
///
/// Invariant: `is_authenticated == token.is_some()` after every store
/// mutation. `temp_token` / `temp_email` carry the two-step
/// register → verify flow and are retired when that flow completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub temp_token: Option<String>,
    pub temp_email: Option<String>,
    pub tenant_id: Option<String>,
    pub is_authenticated: bool,
}

/// Process-wide session state backed by durable storage.
pub struct SessionStore {
    inner: RwLock<Session>,
    storage: Arc<dyn StateStorage>,
}

impl SessionStore {
    /// Create an empty (anonymous) session over the given storage medium.
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            inner: RwLock::new(Session::default()),
            storage,
        }
    }

    /// Owned copy of the current session fields.
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// Token surface shown to UI collaborators: the live token, falling back
    /// to the provisional registration token while verification is pending.
    pub fn effective_token(&self) -> Option<String> {
        let session = self.inner.read();
        session.token.clone().or_else(|| session.temp_token.clone())
    }

    pub fn temp_email(&self) -> Option<String> {
        self.inner.read().temp_email.clone()
    }

    pub fn tenant_id(&self) -> Option<String> {
        self.inner.read().tenant_id.clone()
    }

    /// Adopt a fresh token and persist it.
    pub fn save_token(&self, token: &str) {
        {
            let mut session = self.inner.write();
            session.token = Some(token.to_string());
            session.is_authenticated = true;
        }
        if self.storage.available() {
            self.storage.write(AUTH_TOKEN_KEY, token);
        }
    }

    /// Drop the session and the persisted token.
    ///
    /// Clears `token`, `temp_token`, and `tenant_id`. `temp_email` is left
    /// alone; the verification flow is the one place that retires it.
    pub fn clear(&self) {
        {
            let mut session = self.inner.write();
            session.token = None;
            session.temp_token = None;
            session.tenant_id = None;
            session.is_authenticated = false;
        }
        if self.storage.available() {
            self.storage.remove(AUTH_TOKEN_KEY);
        }
    }

    /// Reload the token from durable storage and derive the authentication
    /// flag from its presence. Returns the token for follow-up decoding.
    ///
    /// Without a storage medium the in-memory token stands as-is.
    pub(crate) fn rehydrate(&self) -> Option<String> {
        let mut session = self.inner.write();
        if self.storage.available() {
            session.token = self.storage.read(AUTH_TOKEN_KEY);
        }
        session.is_authenticated = session.token.is_some();
        session.token.clone()
    }

    /// Stash the registration-flow state alongside the live token.
    pub(crate) fn set_temp_registration(&self, token: Option<String>, email: Option<String>) {
        let mut session = self.inner.write();
        session.temp_token = token;
        session.temp_email = email;
    }

    pub(crate) fn set_tenant_id(&self, tenant_id: Option<String>) {
        self.inner.write().tenant_id = tenant_id;
    }

    pub(crate) fn clear_temp_email(&self) {
        self.inner.write().temp_email = None;
    }
}
