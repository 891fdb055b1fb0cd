//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port with the blocking reqwest
//! client, so a test issues one request and waits for the response head
//! without needing an async runtime of its own.

use std::error::Error as _;
use std::time::Duration;

use reqwest::blocking::{Body, Client};
use tracing::debug;
use url::Url;
use webtest_application::ports::{Transport, TransportError, TransportResponse};
use webtest_domain::{DriverConfig, RequestBody};

const MAX_REDIRECTS: usize = 10;

/// Network transport backed by `reqwest::blocking::Client`.
///
/// Must not be created or used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport from the driver configuration.
    ///
    /// Configuration applied:
    /// - Timeout: `config.timeout`, also overridable per request
    /// - Follow redirects: up to 10
    /// - User-Agent: `config.user_agent`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &DriverConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts the request body to a reqwest body.
    fn build_body(body: RequestBody) -> Option<Body> {
        match body {
            RequestBody::Empty => None,
            RequestBody::Bytes(bytes) => Some(Body::from(bytes.to_vec())),
            RequestBody::Reader(reader) => Some(Body::new(reader)),
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let message = describe(error);
        if error.is_connect() {
            if message.to_lowercase().contains("refused") {
                return TransportError::ConnectionRefused {
                    host: error
                        .url()
                        .and_then(|u| u.host_str().map(ToString::to_string))
                        .unwrap_or_else(|| "unknown".to_string()),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_body() || error.is_request() {
            return TransportError::InvalidBody(message);
        }

        TransportError::Other(message)
    }
}

/// Joins an error with its causes; reqwest keeps the OS reason in the source chain.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: http::Request<RequestBody>,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let (parts, body) = request.into_parts();

        let uri = parts.uri.to_string();
        let url = Url::parse(&uri).map_err(|e| TransportError::InvalidUrl(format!("{e}: {uri}")))?;

        let mut builder = self
            .client
            .request(parts.method, url)
            .headers(parts.headers)
            .timeout(timeout);
        if let Some(body) = Self::build_body(body) {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        debug!(%uri, status, "transport received response head");

        Ok(TransportResponse {
            status,
            headers,
            body: Box::new(response),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(&DriverConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let transport = ReqwestTransport::new(&DriverConfig::default()).unwrap();
        let request = http::Request::get("/users").body(RequestBody::none()).unwrap();

        let result = transport.send(request, Duration::from_secs(1));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_closed_port_is_refused() {
        let port = closed_port();
        let transport = ReqwestTransport::new(&DriverConfig::default()).unwrap();
        let request = http::Request::get(format!("http://127.0.0.1:{port}/"))
            .body(RequestBody::none())
            .unwrap();

        match transport.send(request, Duration::from_secs(2)) {
            Err(TransportError::ConnectionRefused { host, port: got }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(got, port);
            }
            other => panic!("expected connection refused, got {other:?}"),
        }
    }
}
