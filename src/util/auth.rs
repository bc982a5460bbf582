//! Permission gating shared by route guards and element-level checks.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components and the `Can` wrapper must reach identical allow/deny
//! decisions, so every decision goes through [`evaluate_access`] and [`can`].
//! The leptos components in `components::protected_route` only translate
//! the resulting [`Access`] into navigation and rendering.
//!
//! RULES
//! =====
//! - No decision is trusted before the auth store has hydrated.
//! - A path with no rule is open to any signed-in user.
//! - A path with a rule needs at least one of the listed permissions.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::api::SessionEvent;
use crate::state::auth::AuthStore;
use crate::util::storage::KeyValueStore;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const HOME_PATH: &str = "/";

/// Storage key recording where a denied navigation was headed.
pub const REDIRECT_KEY: &str = "redirectAfterLogin";

/// Outcome of gating one route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Hydration has not completed yet.
    Checking,
    Allowed,
    DeniedNotAuthenticated,
    DeniedInsufficientPermission,
}

impl Access {
    /// Where the router should send the user, if anywhere.
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::Checking | Self::Allowed => None,
            Self::DeniedNotAuthenticated => Some(LOGIN_PATH),
            Self::DeniedInsufficientPermission => Some(UNAUTHORIZED_PATH),
        }
    }
}

// =============================================================================
// ROUTE RULES
// =============================================================================

/// Permissions required to enter paths matching `pattern`.
///
/// Patterns are `/`-separated; a `:name` segment matches any single segment
/// and a trailing `*` matches any remainder (including nothing).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePermissionRule {
    pub pattern: String,
    pub permissions: Vec<String>,
}

impl RoutePermissionRule {
    #[must_use]
    pub fn new(pattern: &str, permissions: &[&str]) -> Self {
        Self {
            pattern: pattern.to_owned(),
            permissions: permissions.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(&self.pattern);
        let mut path = segments(path);
        loop {
            match (pattern.next(), path.next()) {
                (Some("*"), _) => return true,
                (None, None) => return true,
                (Some(p), Some(s)) if p.starts_with(':') || p == s => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// Ordered route → permission table; the first matching rule applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteRules {
    rules: Vec<RoutePermissionRule>,
}

impl RouteRules {
    #[must_use]
    pub fn new(rules: Vec<RoutePermissionRule>) -> Self {
        Self { rules }
    }

    /// Permissions required for `path`; empty means unrestricted.
    #[must_use]
    pub fn required_for(&self, path: &str) -> &[String] {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.permissions.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn rules(&self) -> &[RoutePermissionRule] {
        &self.rules
    }
}

// =============================================================================
// DECISIONS
// =============================================================================

/// Gate a route needing any of `required` (empty = any signed-in user).
#[must_use]
pub fn evaluate_access(store: &AuthStore, required: &[String]) -> Access {
    if !store.is_hydrated() {
        return Access::Checking;
    }
    let Some(user) = store.user() else {
        return Access::DeniedNotAuthenticated;
    };
    if required.is_empty() || required.iter().any(|p| user.has_permission(p)) {
        Access::Allowed
    } else {
        Access::DeniedInsufficientPermission
    }
}

/// Gate `path` against `rules`.
#[must_use]
pub fn evaluate_route(store: &AuthStore, rules: &RouteRules, path: &str) -> Access {
    evaluate_access(store, rules.required_for(path))
}

/// Element-level capability check. False when logged out or not hydrated.
#[must_use]
pub fn can(store: &AuthStore, permission: &str) -> bool {
    store.user().is_some_and(|u| u.has_permission(permission))
}

/// Whether an auth-required page should bounce to login.
#[must_use]
pub fn should_redirect_unauth(store: &AuthStore) -> bool {
    store.is_hydrated() && !store.is_logged_in()
}

// =============================================================================
// REDIRECT MARKER
// =============================================================================

/// Rebuild the in-app location from router parts. `search` and `hash` may
/// arrive with or without their leading `?` / `#`.
#[must_use]
pub fn full_path(pathname: &str, search: &str, hash: &str) -> String {
    let mut path = pathname.to_owned();
    let search = search.trim_start_matches('?');
    if !search.is_empty() {
        path.push('?');
        path.push_str(search);
    }
    let hash = hash.trim_start_matches('#');
    if !hash.is_empty() {
        path.push('#');
        path.push_str(hash);
    }
    path
}

/// Record `path` as the post-login destination. The login page itself is
/// never recorded.
pub fn remember_redirect(storage: &dyn KeyValueStore, path: &str) {
    if path.is_empty() || path == LOGIN_PATH || path.starts_with("/login?") || path.starts_with("/login#") {
        return;
    }
    if let Err(e) = storage.set(REDIRECT_KEY, path) {
        tracing::warn!(error = %e, "failed to record redirect path");
    }
}

/// Read and clear the recorded post-login destination.
pub fn take_redirect(storage: &dyn KeyValueStore) -> Option<String> {
    let path = match storage.get(REDIRECT_KEY) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read redirect path");
            None
        }
    };
    if let Err(e) = storage.remove(REDIRECT_KEY) {
        tracing::warn!(error = %e, "failed to clear redirect path");
    }
    path.filter(|p| p.starts_with('/') && !p.starts_with("//"))
}

/// Where to land after a successful login.
#[must_use]
pub fn post_login_destination(marker: Option<String>) -> String {
    marker.unwrap_or_else(|| HOME_PATH.to_owned())
}

// =============================================================================
// SESSION EVENTS
// =============================================================================

/// Apply a client-raised session event to the store and return the path to
/// navigate to.
pub fn apply_session_event(store: &mut AuthStore, event: &SessionEvent) -> Option<&'static str> {
    match event {
        SessionEvent::Forbidden { path } => {
            tracing::warn!(%path, "credential rejected; ending session");
            store.logout();
            Some(LOGIN_PATH)
        }
    }
}
