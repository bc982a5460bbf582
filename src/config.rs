//! Build-time client configuration.
//!
//! The wasm bundle has no process environment, so values are captured with
//! `option_env!` when the crate is compiled and parsed through the same
//! lookup path the tests use.
//!
//! Recognized variables:
//! - `PORTAL_API_URL`: REST API base URL (default `/api`)
//! - `PORTAL_STORAGE_BUCKET`: Firebase Storage bucket for uploaded images

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::util::auth::{RoutePermissionRule, RouteRules};

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_STORAGE_BUCKET: &str = "movement-portal.appspot.com";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an absolute URL or a path starting with '/': {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must not contain '/': {value}")]
    InvalidBucket { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_bucket: String,
    pub route_rules: RouteRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            storage_bucket: DEFAULT_STORAGE_BUCKET.to_owned(),
            route_rules: default_route_rules(),
        }
    }
}

impl AppConfig {
    /// Configuration baked in at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a compiled-in value is malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match key {
            "PORTAL_API_URL" => option_env!("PORTAL_API_URL").map(str::to_owned),
            "PORTAL_STORAGE_BUCKET" => option_env!("PORTAL_STORAGE_BUCKET").map(str::to_owned),
            _ => None,
        })
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the API URL is neither absolute nor
    /// rooted, or the bucket name contains a path separator.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base_url = read("PORTAL_API_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        if !(api_base_url.starts_with('/') || api_base_url.starts_with("http://") || api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidUrl { var: "PORTAL_API_URL", value: api_base_url });
        }
        let trimmed = api_base_url.trim_end_matches('/');
        let api_base_url = if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() };

        let storage_bucket = read("PORTAL_STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_owned());
        if storage_bucket.contains('/') {
            return Err(ConfigError::InvalidBucket { var: "PORTAL_STORAGE_BUCKET", value: storage_bucket });
        }

        Ok(Self { api_base_url, storage_bucket, route_rules: default_route_rules() })
    }
}

/// Route → permission table for the administrative screens. Every other
/// path is open to any signed-in user.
#[must_use]
pub fn default_route_rules() -> RouteRules {
    RouteRules::new(vec![
        RoutePermissionRule::new("/admin/users", &["manage_users"]),
        RoutePermissionRule::new("/admin/categories", &["manage_categories"]),
        RoutePermissionRule::new("/admin/locations", &["manage_locations"]),
        RoutePermissionRule::new("/activities/new", &["manage_activities"]),
        RoutePermissionRule::new("/activities/:id/edit", &["manage_activities"]),
        RoutePermissionRule::new("/news/new", &["manage_news"]),
        RoutePermissionRule::new("/news/:id/edit", &["manage_news"]),
        RoutePermissionRule::new(
            "/admin/*",
            &["manage_users", "manage_categories", "manage_locations", "manage_activities", "manage_news"],
        ),
    ])
}
