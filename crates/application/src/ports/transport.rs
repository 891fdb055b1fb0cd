//! HTTP transport port

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use webtest_domain::{BodyReader, RequestBody};

/// Errors that can occur while exchanging a request over the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be used by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that was exceeded.
        timeout_ms: u64,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request body could not be sent.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// A response as handed back by a transport: head parsed, body still streaming.
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in wire order.
    pub headers: Vec<(String, String)>,
    /// Unread body stream; dropping it closes the connection's body.
    pub body: BodyReader,
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Port for issuing a request over a real network connection.
///
/// Implementations block until the response head arrives. No retries.
pub trait Transport {
    /// Sends the request and returns the response with its body unread.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails, the timeout elapses or the
    /// request cannot be encoded.
    fn send(
        &self,
        request: http::Request<RequestBody>,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        request: http::Request<RequestBody>,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        (**self).send(request, timeout)
    }
}
