//! HTTP transport seam.
//!
//! ARCHITECTURE
//! ============
//! `ApiClient` and `ImageStorage` build [`HttpRequest`] values and hand them
//! to an [`HttpTransport`]. The browser build sends them with `gloo-net`, the
//! server-rendering build with `reqwest`, and tests with scripted fakes.
//! Futures are `?Send` because browser fetch futures are not `Send`.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;

use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Json(String),
    Bytes { content_type: String, bytes: Vec<u8> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// First header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// A response whose body could not be read is a failed request, never an
/// empty body.
pub(crate) fn read_body<E: std::fmt::Display>(text: Result<String, E>) -> Result<String, TransportError> {
    text.map_err(|e| TransportError(format!("failed to read response body: {e}")))
}

/// Transport for builds with neither `hydrate` nor `ssr`; every request
/// fails as a network error.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

#[async_trait(?Send)]
impl HttpTransport for UnavailableTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError(format!("no HTTP transport in this build ({} {})", request.method.as_str(), request.url)))
    }
}

/// The transport matching the enabled feature set.
#[must_use]
pub fn default_transport() -> Arc<dyn HttpTransport> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(GlooTransport)
    }
    #[cfg(all(feature = "ssr", not(feature = "hydrate")))]
    {
        Arc::new(ReqwestTransport::default())
    }
    #[cfg(not(any(feature = "hydrate", feature = "ssr")))]
    {
        Arc::new(UnavailableTransport)
    }
}

// =============================================================================
// BROWSER TRANSPORT
// =============================================================================

/// `fetch`-backed transport for the hydrated client.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };
        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let built = match request.body {
            Some(Body::Json(text)) => builder.body(text),
            Some(Body::Bytes { content_type, bytes }) => builder
                .header("Content-Type", &content_type)
                .body(js_sys::Uint8Array::from(bytes.as_slice())),
            None => builder.build(),
        }
        .map_err(|e| TransportError(e.to_string()))?;

        let resp = built.send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status();
        let body = read_body(resp.text().await)?;
        Ok(HttpResponse { status, body })
    }
}

// =============================================================================
// SERVER TRANSPORT
// =============================================================================

/// `reqwest`-backed transport for server rendering.
#[cfg(feature = "ssr")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "ssr")]
impl ReqwestTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "ssr")]
#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(Body::Json(text)) => builder.body(text),
            Some(Body::Bytes { content_type, bytes }) => builder.header("Content-Type", content_type).body(bytes),
            None => builder,
        };

        let resp = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = read_body(resp.text().await)?;
        Ok(HttpResponse { status, body })
    }
}
