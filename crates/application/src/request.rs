//! Request construction shared by the case runner and the fluent driver.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use webtest_domain::{DomainError, DomainResult, RequestBody};

/// Builds a request from its textual parts.
///
/// `url` may be origin-form (`/users?id=1`) for in-process dispatch or
/// absolute (`http://127.0.0.1:8080/users`) for a live server. `method` is
/// any HTTP token and is used as given; `"get"` is not `GET`.
///
/// # Errors
///
/// Returns an error if the method is not a valid token, the URL does not parse or a
/// header name or value is not valid HTTP.
pub fn build_request(
    method: &str,
    url: &str,
    headers: &[(String, String)],
    body: RequestBody,
) -> DomainResult<http::Request<RequestBody>> {
    let method = http::Method::from_bytes(method.as_bytes())
        .map_err(|_| DomainError::UnsupportedMethod(method.to_string()))?;
    let uri: http::Uri = url
        .parse()
        .map_err(|e| DomainError::InvalidUrl(format!("{e}: {url:?}")))?;

    let mut builder = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| DomainError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| DomainError::InvalidHeaderValue(value.clone()))?;
        builder = builder.header(header_name, header_value);
    }

    builder
        .body(body)
        .map_err(|e| DomainError::InvalidUrl(e.to_string()))
}

/// Drains a request body into memory for in-process dispatch.
///
/// # Errors
///
/// Returns an error if a streaming body fails while being read.
pub fn into_buffered(request: http::Request<RequestBody>) -> DomainResult<http::Request<Bytes>> {
    let (parts, body) = request.into_parts();
    let bytes = body.into_bytes()?;
    Ok(http::Request::from_parts(parts, bytes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_origin_form_url() {
        let request = build_request("GET", "/users-json?page=2", &[], RequestBody::none()).unwrap();
        assert_eq!(request.method(), http::Method::GET);
        assert_eq!(request.uri().path(), "/users-json");
        assert_eq!(request.uri().query(), Some("page=2"));
    }

    #[test]
    fn test_headers_are_attached() {
        let headers = vec![("Accept".to_string(), "application/xml".to_string())];
        let request =
            build_request("POST", "http://127.0.0.1:1/x", &headers, RequestBody::none()).unwrap();
        assert_eq!(request.headers()["accept"], "application/xml");
        assert_eq!(request.method(), http::Method::POST);
    }

    #[test]
    fn test_extension_methods_are_accepted() {
        for token in ["PROPFIND", "PURGE", "REPORT"] {
            let request = build_request(token, "/dav", &[], RequestBody::none()).unwrap();
            assert_eq!(request.method().as_str(), token);
        }
    }

    #[test]
    fn test_method_case_is_preserved() {
        let request = build_request("get", "/", &[], RequestBody::none()).unwrap();
        assert_eq!(request.method().as_str(), "get");
        assert_ne!(request.method(), http::Method::GET);
    }

    #[test]
    fn test_invalid_method_token_is_construction_error() {
        for token in ["BAD METHOD", "", "GET\n"] {
            let result = build_request(token, "/", &[], RequestBody::none());
            assert!(
                matches!(&result, Err(DomainError::UnsupportedMethod(m)) if m == token),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_bad_url_is_construction_error() {
        let result = build_request("GET", "http://exa mple.com/", &[], RequestBody::none());
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_bad_header_name_is_construction_error() {
        let headers = vec![("Bad Header".to_string(), "x".to_string())];
        let result = build_request("GET", "/", &headers, RequestBody::none());
        assert!(matches!(result, Err(DomainError::InvalidHeaderName(_))));
    }

    #[test]
    fn test_buffering_reads_the_stream() {
        let request = build_request(
            "PUT",
            "/echo",
            &[],
            RequestBody::reader(Cursor::new(b"streamed".to_vec())),
        )
        .unwrap();
        let buffered = into_buffered(request).unwrap();
        assert_eq!(buffered.body(), &Bytes::from_static(b"streamed"));
    }
}
