//! Image upload/delete against Firebase Storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Activity, news and profile images live in a Firebase Storage bucket; the
//! REST backend only stores the public download URL. Forms upload first and
//! then submit the returned URL. Replacing an image uploads the new object
//! before deleting the old one so a failed upload never leaves a record
//! pointing at nothing.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use std::sync::Arc;

use serde::Deserialize;

use super::api::ApiError;
use super::transport::{Body, HttpRequest, HttpTransport, Method};

pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com/v0";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

#[derive(Clone)]
pub struct ImageStorage {
    endpoint: String,
    bucket: String,
    transport: Arc<dyn HttpTransport>,
}

impl ImageStorage {
    #[must_use]
    pub fn new(bucket: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_endpoint(DEFAULT_STORAGE_ENDPOINT, bucket, transport)
    }

    #[must_use]
    pub fn with_endpoint(endpoint: &str, bucket: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            bucket: bucket.to_owned(),
            transport,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/b/{}/o/{}", self.endpoint, self.bucket, urlencoding::encode(path))
    }

    /// Public download URL for `path` carrying the object's access token.
    #[must_use]
    pub fn download_url(&self, path: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("{}?alt=media&token={}", self.object_url(path), urlencoding::encode(token)),
            None => format!("{}?alt=media", self.object_url(path)),
        }
    }

    /// Upload `bytes` to `path` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the transport fails, storage rejects the
    /// upload, or the response cannot be parsed.
    pub async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ApiError> {
        let url = format!("{}/b/{}/o?name={}", self.endpoint, self.bucket, urlencoding::encode(path));
        let req = HttpRequest::new(Method::Post, url).body(Body::Bytes { content_type: content_type.to_owned(), bytes });

        let resp = self.transport.send(req).await.map_err(|e| ApiError::network(e.to_string()))?;
        if !resp.is_success() {
            let err = ApiError::from_response(&resp);
            tracing::warn!(path, status = err.status, "image upload rejected");
            return Err(err);
        }
        let uploaded: UploadResponse = serde_json::from_str(&resp.body).map_err(|e| ApiError {
            status: resp.status,
            message: "Invalid upload response".to_owned(),
            data: serde_json::json!({ "reason": e.to_string() }),
        })?;
        // Objects may carry several comma-separated tokens; any one grants access.
        let token = uploaded.download_tokens.as_deref().and_then(|t| t.split(',').next());
        tracing::debug!(path = %uploaded.name, "image uploaded");
        Ok(self.download_url(&uploaded.name, token))
    }

    /// Delete the object at `path`. A missing object counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the transport fails or storage rejects the
    /// delete for any reason other than 404.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let req = HttpRequest::new(Method::Delete, self.object_url(path));
        let resp = self.transport.send(req).await.map_err(|e| ApiError::network(e.to_string()))?;
        if resp.is_success() || resp.status == 404 {
            return Ok(());
        }
        Err(ApiError::from_response(&resp))
    }

    /// Upload a replacement image under `folder`, then drop the previous one.
    ///
    /// Deleting the old object is best-effort: the new URL is returned even
    /// if that delete fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] only when the upload fails; the old image is then
    /// left untouched.
    pub async fn replace(
        &self,
        old_url: Option<&str>,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ApiError> {
        let new_url = self.upload(&object_path(folder, file_name), bytes, content_type).await?;
        if let Some(old_path) = old_url.and_then(path_from_url) {
            if let Err(e) = self.delete(&old_path).await {
                tracing::warn!(path = %old_path, error = %e, "failed to delete replaced image");
            }
        }
        Ok(new_url)
    }
}

/// Unique object path `folder/<uuid>_<sanitized file name>`.
#[must_use]
pub fn object_path(folder: &str, file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let folder = folder.trim_matches('/');
    let id = uuid::Uuid::new_v4().simple();
    if folder.is_empty() { format!("{id}_{sanitized}") } else { format!("{folder}/{id}_{sanitized}") }
}

/// Recover the object path from a download URL produced by this module.
#[must_use]
pub fn path_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/o/")?;
    let encoded = rest.split(['?', '#']).next()?;
    if encoded.is_empty() {
        return None;
    }
    urlencoding::decode(encoded).ok().map(std::borrow::Cow::into_owned)
}
