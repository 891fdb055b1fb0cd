//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while assembling a request or its configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name is not a valid HTTP token.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value contains forbidden bytes.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// The HTTP method is not a valid token.
    #[error("unsupported HTTP method: {0:?}")]
    UnsupportedMethod(String),

    /// The request body could not be read.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig {
        /// The configuration key that failed.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
