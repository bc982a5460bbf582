use super::*;

fn user_json(extra: serde_json::Value) -> serde_json::Value {
    let mut base = serde_json::json!({
        "id": "u-1",
        "firstName": "Noa",
        "lastName": "Levi",
        "email": "noa@example.org",
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    base
}

fn perms(user: &UserSummary) -> Vec<&str> {
    user.permissions.iter().map(String::as_str).collect()
}

// =============================================================================
// UserSummary normalization
// =============================================================================

#[test]
fn role_permissions_take_precedence_over_flat_list() {
    let user: UserSummary = serde_json::from_value(user_json(serde_json::json!({
        "role": { "name": "admin", "permissions": ["manage_users", "manage_news"] },
        "permissions": ["view_reports"],
    })))
    .unwrap();
    assert_eq!(user.role.as_deref(), Some("admin"));
    assert_eq!(perms(&user), vec!["manage_news", "manage_users"]);
}

#[test]
fn flat_permissions_used_when_role_absent() {
    let user: UserSummary = serde_json::from_value(user_json(serde_json::json!({
        "permissions": ["manage_news"],
    })))
    .unwrap();
    assert_eq!(user.role, None);
    assert_eq!(perms(&user), vec!["manage_news"]);
}

#[test]
fn flat_permissions_used_when_role_has_no_list() {
    let user: UserSummary = serde_json::from_value(user_json(serde_json::json!({
        "role": { "name": "member" },
        "permissions": ["enroll"],
    })))
    .unwrap();
    assert_eq!(user.role.as_deref(), Some("member"));
    assert_eq!(perms(&user), vec!["enroll"]);
}

#[test]
fn empty_role_list_still_wins_over_flat_list() {
    let user: UserSummary = serde_json::from_value(user_json(serde_json::json!({
        "role": { "name": "guest", "permissions": [] },
        "permissions": ["manage_news"],
    })))
    .unwrap();
    assert!(user.permissions.is_empty());
}

#[test]
fn missing_permissions_normalize_to_empty_set() {
    let user: UserSummary = serde_json::from_value(user_json(serde_json::json!({}))).unwrap();
    assert!(user.permissions.is_empty());
}

#[test]
fn numeric_and_underscore_ids_are_accepted() {
    let raw = serde_json::json!({ "_id": 42, "email": "x@example.org" });
    let user: UserSummary = serde_json::from_value(raw).unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.first_name, "");
}

#[test]
fn user_without_email_is_rejected() {
    let raw = serde_json::json!({ "id": "u-1" });
    assert!(serde_json::from_value::<UserSummary>(raw).is_err());
}

#[test]
fn user_summary_serialization_normalizes_back_to_itself() {
    let user: UserSummary = serde_json::from_value(user_json(serde_json::json!({
        "role": { "name": "admin", "permissions": ["manage_users"] },
    })))
    .unwrap();
    let text = serde_json::to_string(&user).unwrap();
    let back: UserSummary = serde_json::from_str(&text).unwrap();
    assert_eq!(back, user);
}

#[test]
fn display_name_falls_back_to_email() {
    let mut user: UserSummary = serde_json::from_value(user_json(serde_json::json!({}))).unwrap();
    assert_eq!(user.display_name(), "Noa Levi");
    user.first_name.clear();
    user.last_name.clear();
    assert_eq!(user.display_name(), "noa@example.org");
}

// =============================================================================
// Content DTOs
// =============================================================================

#[test]
fn login_response_parses_nested_user() {
    let raw = serde_json::json!({
        "token": "t-1",
        "user": user_json(serde_json::json!({ "permissions": ["enroll"] })),
    });
    let resp: LoginResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(resp.token, "t-1");
    assert!(resp.user.has_permission("enroll"));
}

#[test]
fn activity_parses_optional_fields_and_numeric_refs() {
    let raw = serde_json::json!({
        "_id": "a-1",
        "title": "Night hike",
        "startDate": "2026-11-01T18:00:00Z",
        "categoryId": 7,
        "capacity": 2,
        "enrolledCount": 1,
    });
    let activity: Activity = serde_json::from_value(raw).unwrap();
    assert_eq!(activity.id, "a-1");
    assert_eq!(activity.category_id.as_deref(), Some("7"));
    assert_eq!(activity.location_id, None);
    assert_eq!(activity.description, "");
    assert!(activity.has_open_spots());
}

#[test]
fn activity_full_or_unlimited() {
    let mut activity: Activity = serde_json::from_value(serde_json::json!({
        "id": "a-2",
        "title": "Camp",
        "startDate": "2026-12-01",
        "capacity": 1,
        "enrolledCount": 1,
    }))
    .unwrap();
    assert!(!activity.has_open_spots());
    activity.capacity = None;
    assert!(activity.has_open_spots());
}

#[test]
fn enrollment_status_defaults_to_active() {
    let raw = serde_json::json!({ "id": "e-1", "activityId": "a-1", "userId": 5 });
    let enrollment: Enrollment = serde_json::from_value(raw).unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Active);
    assert_eq!(enrollment.user_id, "5");

    let raw = serde_json::json!({ "id": "e-2", "activityId": "a-1", "userId": "u", "status": "waitlisted" });
    let enrollment: Enrollment = serde_json::from_value(raw).unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Waitlisted);
}

#[test]
fn profile_update_skips_unset_fields() {
    let update = ProfileUpdate { first_name: Some("Dana".to_owned()), ..ProfileUpdate::default() };
    assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({ "firstName": "Dana" }));
}

#[test]
fn new_category_omits_missing_description() {
    let draft = NewCategory { name: "Hikes".to_owned(), description: None };
    assert_eq!(serde_json::to_value(&draft).unwrap(), serde_json::json!({ "name": "Hikes" }));
}
