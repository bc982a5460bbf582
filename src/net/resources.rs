//! Typed REST endpoints.
//!
//! DESIGN
//! ======
//! Admin CRUD screens differ only by collection path and row type, so they go
//! through one generic [`Resource`] impl per entity. Auth and enrollment
//! endpoints, which are not plain CRUD, get dedicated functions.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{ApiClient, ApiError};
use super::transport::Method;
use super::types::{
    Activity, Category, Enrollment, Location, LoginRequest, LoginResponse, NewsItem, ProfileUpdate, UserSummary,
};

/// An entity exposed as a plain REST collection.
pub trait Resource: DeserializeOwned {
    /// Collection path, e.g. `/categories`.
    const COLLECTION: &'static str;
}

impl Resource for Activity {
    const COLLECTION: &'static str = "/activities";
}

impl Resource for NewsItem {
    const COLLECTION: &'static str = "/news";
}

impl Resource for Category {
    const COLLECTION: &'static str = "/categories";
}

impl Resource for Location {
    const COLLECTION: &'static str = "/locations";
}

impl Resource for UserSummary {
    const COLLECTION: &'static str = "/users";
}

fn item_path<R: Resource>(id: &str) -> String {
    format!("{}/{}", R::COLLECTION, urlencoding::encode(id))
}

fn enroll_path(activity_id: &str) -> String {
    format!("/activities/{}/enroll", urlencoding::encode(activity_id))
}

fn activity_enrollments_path(activity_id: &str) -> String {
    format!("/activities/{}/enrollments", urlencoding::encode(activity_id))
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn list<R: Resource>(api: &ApiClient) -> Result<Vec<R>, ApiError> {
    api.get_json(R::COLLECTION).await
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn get<R: Resource>(api: &ApiClient, id: &str) -> Result<R, ApiError> {
    api.get_json(&item_path::<R>(id)).await
}

/// Create an entity from `draft` and return the stored row.
///
/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn create<R: Resource, B: Serialize + ?Sized>(api: &ApiClient, draft: &B) -> Result<R, ApiError> {
    api.send_json(Method::Post, R::COLLECTION, draft).await
}

/// Replace entity `id` with `draft` and return the stored row.
///
/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn update<R: Resource, B: Serialize + ?Sized>(api: &ApiClient, id: &str, draft: &B) -> Result<R, ApiError> {
    api.send_json(Method::Put, &item_path::<R>(id), draft).await
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn remove<R: Resource>(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete(&item_path::<R>(id)).await.map(|_| ())
}

// =============================================================================
// AUTH
// =============================================================================

/// Exchange credentials for a session token and user.
///
/// # Errors
///
/// Propagates [`ApiError`]; invalid credentials surface as the backend's
/// status and message.
pub async fn login(api: &ApiClient, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
    api.send_json(Method::Post, "/auth/login", credentials).await
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn fetch_profile(api: &ApiClient) -> Result<UserSummary, ApiError> {
    api.get_json("/users/me").await
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn update_profile(api: &ApiClient, update: &ProfileUpdate) -> Result<UserSummary, ApiError> {
    api.send_json(Method::Patch, "/users/me", update).await
}

// =============================================================================
// ENROLLMENT
// =============================================================================

/// # Errors
///
/// Propagates [`ApiError`]; a full activity or duplicate enrollment comes
/// back as the backend's 4xx message.
pub async fn enroll(api: &ApiClient, activity_id: &str) -> Result<Enrollment, ApiError> {
    api.send_json(Method::Post, &enroll_path(activity_id), &serde_json::json!({})).await
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn cancel_enrollment(api: &ApiClient, activity_id: &str) -> Result<(), ApiError> {
    api.delete(&enroll_path(activity_id)).await.map(|_| ())
}

/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn my_enrollments(api: &ApiClient) -> Result<Vec<Enrollment>, ApiError> {
    api.get_json("/enrollments/me").await
}

/// Enrollments for one activity (organizer view).
///
/// # Errors
///
/// Propagates [`ApiError`] from the request.
pub async fn activity_enrollments(api: &ApiClient, activity_id: &str) -> Result<Vec<Enrollment>, ApiError> {
    api.get_json(&activity_enrollments_path(activity_id)).await
}
