use futures::executor::block_on;

use super::*;

#[test]
fn header_lookup_ignores_case() {
    let req = HttpRequest::new(Method::Get, "https://api.example.org/x").header("Content-Type", "application/json");
    assert_eq!(req.header_value("content-type"), Some("application/json"));
    assert_eq!(req.header_value("Accept"), None);
}

#[test]
fn success_range_is_2xx() {
    let resp = |status| HttpResponse { status, body: String::new() };
    assert!(resp(200).is_success());
    assert!(resp(204).is_success());
    assert!(!resp(199).is_success());
    assert!(!resp(304).is_success());
    assert!(!resp(0).is_success());
}

#[test]
fn method_names() {
    let names: Vec<&str> =
        [Method::Get, Method::Post, Method::Put, Method::Patch, Method::Delete].map(Method::as_str).to_vec();
    assert_eq!(names, vec!["GET", "POST", "PUT", "PATCH", "DELETE"]);
}

#[test]
fn unavailable_transport_fails_every_request() {
    let err = block_on(UnavailableTransport.send(HttpRequest::new(Method::Delete, "/categories/1"))).unwrap_err();
    assert!(err.0.contains("DELETE /categories/1"));
}

#[test]
fn unreadable_body_is_a_transport_error() {
    assert_eq!(read_body(Ok::<_, String>("{}".to_owned())), Ok("{}".to_owned()));
    let err = read_body(Err::<String, _>("connection reset")).unwrap_err();
    assert_eq!(err, TransportError("failed to read response body: connection reset".to_owned()));
}

#[test]
fn body_read_failure_surfaces_as_network_error() {
    use crate::net::api::ApiClient;

    struct TruncatingTransport;

    #[async_trait(?Send)]
    impl HttpTransport for TruncatingTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let body = read_body(Err::<String, _>("stream truncated"))?;
            Ok(HttpResponse { status: 204, body })
        }
    }

    let api = ApiClient::new("https://api.example.org", Arc::new(TruncatingTransport));
    let err = block_on(api.delete("/categories/1")).unwrap_err();
    assert!(err.is_network());
    assert!(err.message.contains("stream truncated"));
}
