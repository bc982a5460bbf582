use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_unset() {
    let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.storage_bucket, DEFAULT_STORAGE_BUCKET);
}

#[test]
fn from_lookup_blank_values_count_as_unset() {
    let cfg = AppConfig::from_lookup(lookup(&[("PORTAL_API_URL", "  "), ("PORTAL_STORAGE_BUCKET", "")])).unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.storage_bucket, DEFAULT_STORAGE_BUCKET);
}

#[test]
fn from_lookup_trims_trailing_slashes() {
    let cfg = AppConfig::from_lookup(lookup(&[
        ("PORTAL_API_URL", "https://api.example.org/v1//"),
        ("PORTAL_STORAGE_BUCKET", "tnua.appspot.com"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.org/v1");
    assert_eq!(cfg.storage_bucket, "tnua.appspot.com");
}

#[test]
fn from_lookup_keeps_bare_root() {
    let cfg = AppConfig::from_lookup(lookup(&[("PORTAL_API_URL", "/")])).unwrap();
    assert_eq!(cfg.api_base_url, "/");
}

#[test]
fn from_lookup_rejects_relative_url() {
    let err = AppConfig::from_lookup(lookup(&[("PORTAL_API_URL", "api.example.org")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidUrl { var: "PORTAL_API_URL", value: "api.example.org".to_owned() });
}

#[test]
fn from_lookup_rejects_bucket_with_path() {
    let err = AppConfig::from_lookup(lookup(&[("PORTAL_STORAGE_BUCKET", "bucket/images")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBucket { .. }));
}

#[test]
fn default_rules_gate_admin_screens() {
    let rules = default_route_rules();
    assert_eq!(rules.required_for("/admin/categories"), ["manage_categories".to_owned()].as_slice());
    assert_eq!(rules.required_for("/activities/a-9/edit"), ["manage_activities".to_owned()].as_slice());
    assert_eq!(rules.required_for("/admin/reports").len(), 5);
    assert!(rules.required_for("/activities").is_empty());
    assert!(rules.required_for("/activities/a-9").is_empty());
    assert!(rules.required_for("/").is_empty());
}
