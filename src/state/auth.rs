//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "who is signed in and what may they do". The
//! root component owns one store inside an `RwSignal` and provides it through
//! context; route guards, the API client's token lookup and user-aware
//! components all read from it.
//!
//! LIFECYCLE
//! =========
//! A store starts un-hydrated. `hydrate` restores the persisted session once;
//! until then gating decisions report "checking". `login` and `logout` are the
//! only other mutations. The persisted form is a single JSON object under
//! [`SESSION_KEY`] holding the user fields plus the token.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::net::types::{UserSummary, WireUser};
use crate::util::storage::{JsonLoad, SharedStore, load_json, save_json};

/// Storage key of the persisted session blob.
pub const SESSION_KEY: &str = "user";

/// An authenticated identity plus its bearer credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

/// Persisted `{ ...user, token }` blob.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(flatten)]
    user: WireUser,
    token: String,
}

/// Authentication state tracking the current session and hydration status.
#[derive(Clone)]
pub struct AuthStore {
    storage: Option<SharedStore>,
    hydrated: bool,
    session: Option<Session>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("has_storage", &self.storage.is_some())
            .field("hydrated", &self.hydrated)
            .field("session", &self.session.as_ref().map(|s| &s.user.id))
            .finish()
    }
}

impl AuthStore {
    /// Create an un-hydrated, logged-out store over `storage`.
    ///
    /// `None` means no persistence medium exists; the first `hydrate` then
    /// settles into a logged-out state.
    #[must_use]
    pub fn new(storage: Option<SharedStore>) -> Self {
        Self { storage, hydrated: false, session: None }
    }

    /// Restore the persisted session. Only the first call has any effect.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;
        self.session = None;

        let Some(storage) = self.storage.as_deref() else {
            tracing::debug!("no session storage available; starting logged out");
            return;
        };

        match load_json::<StoredSession>(storage, SESSION_KEY) {
            JsonLoad::Loaded(stored) if !stored.token.trim().is_empty() => {
                let user = UserSummary::from(stored.user);
                tracing::debug!(user_id = %user.id, "session restored");
                self.session = Some(Session { token: stored.token, user });
            }
            JsonLoad::Loaded(_) => {
                tracing::warn!("persisted session has an empty token; clearing it");
                self.clear_persisted();
            }
            JsonLoad::Missing => {}
            JsonLoad::Corrupt(reason) => {
                tracing::warn!(error = %reason, "persisted session is corrupt; clearing it");
                self.clear_persisted();
            }
            JsonLoad::Unreadable(e) => {
                tracing::warn!(error = %e, "session storage unreadable; starting logged out");
            }
        }
    }

    /// Start a session for `user` and persist it.
    pub fn login(&mut self, user: UserSummary, token: String) {
        if let Some(storage) = self.storage.as_deref() {
            let stored = StoredSession { user: user.to_wire(), token: token.clone() };
            if let Err(e) = save_json(storage, SESSION_KEY, &stored) {
                tracing::warn!(error = %e, "failed to persist session; continuing in memory");
            }
        }
        tracing::info!(user_id = %user.id, "logged in");
        self.session = Some(Session { token, user });
        self.hydrated = true;
    }

    /// End the current session, if any, and clear the persisted copy.
    pub fn logout(&mut self) {
        self.clear_persisted();
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = %session.user.id, "logged out");
        }
    }

    fn clear_persisted(&self) {
        if let Some(storage) = self.storage.as_deref() {
            if let Err(e) = storage.remove(SESSION_KEY) {
                tracing::warn!(error = %e, "failed to clear persisted session");
            }
        }
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserSummary> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Effective permission set of the signed-in user; empty when logged out.
    #[must_use]
    pub fn permissions(&self) -> BTreeSet<String> {
        self.user().map(|u| u.permissions.clone()).unwrap_or_default()
    }

    /// Durable storage this store persists to, shared with redirect-marker
    /// bookkeeping.
    #[must_use]
    pub fn storage(&self) -> Option<&SharedStore> {
        self.storage.as_ref()
    }
}
