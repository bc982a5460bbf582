//! REST API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page talks to the backend through one `ApiClient` provided via
//! context. It prefixes the configured base URL, attaches the bearer token
//! read from the auth store, and normalizes every failure into [`ApiError`].
//!
//! ERROR HANDLING
//! ==============
//! Callers only ever see `ApiError { status, message, data }`. Transport
//! failures use [`NETWORK_ERROR_STATUS`]. A 403 additionally emits
//! [`SessionEvent::Forbidden`] to the registered listener; the router decides
//! what that means (logout + redirect). The client itself never touches the
//! store or navigation.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{Body, HttpRequest, HttpResponse, HttpTransport, Method};

/// Status carried by errors that never reached the server.
pub const NETWORK_ERROR_STATUS: u16 = 0;

/// Uniform error shape for every failed request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub data: serde_json::Value,
}

impl ApiError {
    #[must_use]
    pub fn network(reason: impl Into<String>) -> Self {
        Self {
            status: NETWORK_ERROR_STATUS,
            message: reason.into(),
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Build the error for a non-2xx response.
    #[must_use]
    pub fn from_response(resp: &HttpResponse) -> Self {
        let data = serde_json::from_str::<serde_json::Value>(&resp.body)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));
        let message = error_message(&data).unwrap_or_else(|| failed_status_message(resp.status));
        Self { status: resp.status, message, data }
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        self.status == NETWORK_ERROR_STATUS
    }
}

fn error_message(data: &serde_json::Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| data.get(key).and_then(serde_json::Value::as_str))
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}

fn failed_status_message(status: u16) -> String {
    format!("Request failed with status {status}")
}

/// Session-level signal raised by the client for the routing layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend refused the current credential for `path`.
    Forbidden { path: String },
}

type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;
type SessionListener = Arc<dyn Fn(SessionEvent) + Send + Sync>;

/// Per-request options for [`ApiClient::request`].
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::Get, body: None, headers: Vec::new() }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    token: TokenSource,
    on_session_event: Option<SessionListener>,
}

impl ApiClient {
    /// Client for `base_url` that sends no credentials until
    /// [`with_token_source`](Self::with_token_source) is set.
    #[must_use]
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            transport,
            token: Arc::new(|| None),
            on_session_event: None,
        }
    }

    /// Read the bearer token from `source` before every request.
    #[must_use]
    pub fn with_token_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.token = Arc::new(source);
        self
    }

    /// Register the listener that receives [`SessionEvent`]s.
    #[must_use]
    pub fn on_session_event<F>(mut self, listener: F) -> Self
    where
        F: Fn(SessionEvent) + Send + Sync + 'static,
    {
        self.on_session_event = Some(Arc::new(listener));
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Whether `url` addresses the configured API. Credentials go nowhere else.
    fn is_api_url(&self, url: &str) -> bool {
        let absolute = |u: &str| u.starts_with("http://") || u.starts_with("https://");
        if !absolute(url) {
            return true;
        }
        if !absolute(&self.base_url) {
            return false;
        }
        url.strip_prefix(self.base_url.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
    }

    /// Execute a request and return the parsed JSON body.
    ///
    /// An empty success body yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures, non-2xx responses and
    /// success bodies that are not JSON.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<serde_json::Value, ApiError> {
        self.execute(path, options).await.map(|(_, value)| value)
    }

    /// [`request`](Self::request), also returning the response status.
    async fn execute(&self, path: &str, options: RequestOptions) -> Result<(u16, serde_json::Value), ApiError> {
        let url = self.url(path);
        let mut req = HttpRequest::new(options.method, url.as_str()).header("Accept", "application/json");
        if self.is_api_url(&url) {
            if let Some(token) = (self.token)().filter(|t| !t.is_empty()) {
                req = req.header("Authorization", format!("Bearer {token}"));
            }
        } else {
            tracing::debug!(%url, "off-origin request; omitting credentials");
        }
        for (name, value) in options.headers {
            req = req.header(&name, value);
        }
        if let Some(body) = options.body {
            req = req
                .header("Content-Type", "application/json")
                .body(Body::Json(body.to_string()));
        }

        let method = options.method;
        let resp = match self.transport.send(req).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(method = method.as_str(), path, error = %e, "request failed before a response");
                return Err(ApiError::network(e.to_string()));
            }
        };

        if !resp.is_success() {
            let err = ApiError::from_response(&resp);
            tracing::debug!(method = method.as_str(), path, status = err.status, message = %err.message, "request rejected");
            if err.is_forbidden() {
                self.emit(SessionEvent::Forbidden { path: path.to_owned() });
            }
            return Err(err);
        }

        if resp.body.trim().is_empty() {
            return Ok((resp.status, serde_json::Value::Null));
        }
        serde_json::from_str(&resp.body)
            .map(|value| (resp.status, value))
            .map_err(|e| invalid_body(resp.status, &e))
    }

    fn emit(&self, event: SessionEvent) {
        match &self.on_session_event {
            Some(listener) => listener(event),
            None => tracing::debug!(?event, "session event dropped; no listener registered"),
        }
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.request(path, RequestOptions::method(Method::Get)).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, ApiError> {
        self.request(path, RequestOptions::method(Method::Post).json(body)).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, ApiError> {
        self.request(path, RequestOptions::method(Method::Put).json(body)).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, ApiError> {
        self.request(path, RequestOptions::method(Method::Patch).json(body)).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.request(path, RequestOptions::method(Method::Delete)).await
    }

    /// `GET` and decode the body as `T`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request); decoding failures are reported as
    /// `"Invalid response body"`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let (status, value) = self.execute(path, RequestOptions::method(Method::Get)).await?;
        decode(status, value)
    }

    /// Send `body` with `method` and decode the response as `T`.
    ///
    /// # Errors
    ///
    /// See [`get_json`](Self::get_json).
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError {
            status: NETWORK_ERROR_STATUS,
            message: "Request body could not be encoded".to_owned(),
            data: serde_json::json!({ "reason": e.to_string() }),
        })?;
        let (status, value) = self.execute(path, RequestOptions::method(method).json(body)).await?;
        decode(status, value)
    }
}

fn invalid_body(status: u16, err: &serde_json::Error) -> ApiError {
    ApiError {
        status,
        message: "Invalid response body".to_owned(),
        data: serde_json::json!({ "reason": err.to_string() }),
    }
}

fn decode<T: DeserializeOwned>(status: u16, value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| invalid_body(status, &e))
}
