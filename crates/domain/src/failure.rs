//! Fatal test failures.
//!
//! A `Failure` is the single signal every engine error funnels into. Once one
//! is produced the current case or request chain is over: it is reported and
//! then returned to the caller, never recovered from.

use std::fmt;

use thiserror::Error;

/// Which phase of a case or request produced the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request could not be built (method, URL, header or body).
    Construction,

    /// The transport could not complete the exchange.
    Transport,

    /// The response body did not decode into the requested entity.
    Decode,

    /// A decodable body was expected but the Content-Type was missing or unrecognized.
    MissingContentType,

    /// The test itself is malformed, e.g. asking for both JSON and XML decoding.
    BadTestCase,

    /// The response status did not match the expectation.
    Status,

    /// The caller's validator rejected the response.
    Validation,
}

impl FailureKind {
    /// Returns true if the failure blames the test rather than the system under test.
    #[must_use]
    pub const fn is_test_authoring_error(&self) -> bool {
        matches!(self, Self::BadTestCase)
    }
}

/// A terminal failure, already formatted for the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
}

impl Failure {
    /// Creates a failure from a preformatted message.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a failure scoped to a named test case.
    ///
    /// Formats as `failed test case "<name>": <phase>: <cause>`.
    #[must_use]
    pub fn for_case(
        kind: FailureKind,
        case_name: &str,
        phase: &str,
        cause: impl fmt::Display,
    ) -> Self {
        Self::new(
            kind,
            format!("failed test case {case_name:?}: {phase}: {cause}"),
        )
    }

    /// Creates a failure scoped to a single request.
    ///
    /// Formats as `<METHOD> <path> ... failed: <cause>`.
    #[must_use]
    pub fn for_request(
        kind: FailureKind,
        method: &str,
        path: &str,
        cause: impl fmt::Display,
    ) -> Self {
        Self::new(kind, format!("{method} {path} ... failed: {cause}"))
    }

    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the formatted message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for engine operations that may fail fatally.
pub type FailureResult<T> = Result<T, Failure>;
