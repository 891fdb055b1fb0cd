//! Drive Request Use Case
//!
//! Issues one request over a real transport and hands back a chainable
//! response for one-request-at-a-time assertions.

use std::fmt;
use std::io::{self, Read};

use tracing::debug;
use webtest_domain::{
    BodyFormat, BodyReader, DriverConfig, Failure, FailureKind, FailureResult, RequestBody,
};

use crate::decode::Entity;
use crate::ports::{FailureReporter, Transport, report};
use crate::request::build_request;

const BAD_TEST_CASE: &str = "BAD TEST CASE: UNABLE TO UNMARSHAL RESPONSE TO XML AND JSON";

/// Fluent request driver bound to a transport and its configuration.
///
/// # Example
///
/// ```ignore
/// let driver = Driver::new(ReqwestTransport::new(&config)?, config);
/// let mut user = User::default();
/// driver
///     .do_request(&PanicReporter, &server.url(), "GET", "/users/abc", RequestBody::none())?
///     .expect(Expect::with_status(200).json(&mut user))?;
/// ```
#[derive(Debug, Clone)]
pub struct Driver<T: Transport> {
    transport: T,
    config: DriverConfig,
}

impl<T: Transport> Driver<T> {
    /// Creates a driver. The config's timeout applies to every request it issues.
    pub const fn new(transport: T, config: DriverConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the driver configuration.
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds a request against `base_url` + `path` and issues it.
    ///
    /// `base_url` is typically a test server's root URL such as
    /// `http://127.0.0.1:40123`; the two parts are joined verbatim.
    ///
    /// # Errors
    ///
    /// Fails if the request cannot be built or the transport fails.
    pub fn do_request<'r, R>(
        &self,
        reporter: &'r R,
        base_url: &str,
        method: &str,
        path: &str,
        body: impl Into<RequestBody>,
    ) -> FailureResult<Response<'r, R>>
    where
        R: FailureReporter + ?Sized,
    {
        let url = format!("{base_url}{path}");
        let request = build_request(method, &url, &[], body.into()).map_err(|e| {
            report(
                reporter,
                Failure::new(
                    FailureKind::Construction,
                    format!("unable to generate HTTP request: {e}"),
                ),
            )
        })?;
        self.do_req(reporter, request)
    }

    /// Issues a prepared request.
    ///
    /// # Errors
    ///
    /// Fails if the transport cannot complete the exchange within the
    /// configured timeout. There is no retry.
    pub fn do_req<'r, R>(
        &self,
        reporter: &'r R,
        request: http::Request<RequestBody>,
    ) -> FailureResult<Response<'r, R>>
    where
        R: FailureReporter + ?Sized,
    {
        let method = request.method().to_string();
        let path = request.uri().path().to_string();
        debug!(
            %method,
            uri = %request.uri(),
            timeout_ms = self.config.timeout_ms(),
            "issuing request"
        );

        let response = self
            .transport
            .send(request, self.config.timeout)
            .map_err(|e| {
                report(
                    reporter,
                    Failure::new(
                        FailureKind::Transport,
                        format!("unexpected error issuing HTTP request: {e}"),
                    ),
                )
            })?;
        debug!(%method, %path, status = response.status, "response received");

        Ok(Response {
            reporter,
            method,
            path,
            status: response.status,
            headers: response.headers,
            body: Some(response.body),
        })
    }
}

/// Expected outcome for [`Response::expect`].
///
/// A zero status skips the status check. At most one of the JSON and XML
/// targets may be set.
#[derive(Default)]
pub struct Expect<'a> {
    /// Expected status code, or 0 to accept any.
    pub status: u16,
    /// Target to decode the body into as JSON.
    pub json: Option<&'a mut dyn Entity>,
    /// Target to decode the body into as XML.
    pub xml: Option<&'a mut dyn Entity>,
}

impl<'a> Expect<'a> {
    /// Creates an expectation that checks nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an expectation on the status code only.
    #[must_use]
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Decodes the body as JSON into `target`.
    #[must_use]
    pub fn json<T: Entity>(mut self, target: &'a mut T) -> Self {
        self.json = Some(target);
        self
    }

    /// Decodes the body as XML into `target`.
    #[must_use]
    pub fn xml<T: Entity>(mut self, target: &'a mut T) -> Self {
        self.xml = Some(target);
        self
    }
}

impl fmt::Debug for Expect<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expect")
            .field("status", &self.status)
            .field("json", &self.json.is_some())
            .field("xml", &self.xml.is_some())
            .finish()
    }
}

/// A response bound to the reporter of the request that produced it.
///
/// The body stream is closed by the first [`Response::expect`] call, whatever
/// its outcome. Later calls see an empty body.
pub struct Response<'r, R: FailureReporter + ?Sized> {
    reporter: &'r R,
    method: String,
    path: String,
    status: u16,
    headers: Vec<(String, String)>,
    body: Option<BodyReader>,
}

impl<R: FailureReporter + ?Sized> Response<'_, R> {
    /// Returns the response status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns all response headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns true once the body stream has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.body.is_none()
    }

    /// Enforces `expect` against this response and closes the body.
    ///
    /// # Errors
    ///
    /// Fails on a malformed expectation, a status mismatch (the message
    /// carries the body), or a body that does not decode into the target.
    pub fn expect(&mut self, expect: Expect<'_>) -> FailureResult<&mut Self> {
        // Dropped on every return path, which closes the stream.
        let mut body: BodyReader = self.body.take().unwrap_or_else(|| Box::new(io::empty()));

        if expect.json.is_some() && expect.xml.is_some() {
            return Err(self.fail(FailureKind::BadTestCase, BAD_TEST_CASE));
        }

        if expect.status != 0 && expect.status != self.status {
            let mut raw = Vec::new();
            if let Err(e) = body.read_to_end(&mut raw) {
                debug!(error = %e, "response body unreadable");
            }
            return Err(self.fail(
                FailureKind::Status,
                format!(
                    "expected status {}, got: {} with body:\n{}",
                    expect.status,
                    self.status,
                    String::from_utf8_lossy(&raw)
                ),
            ));
        }

        if let Some(target) = expect.json {
            self.decode(target, BodyFormat::Json, &mut body)?;
        }
        if let Some(target) = expect.xml {
            self.decode(target, BodyFormat::Xml, &mut body)?;
        }

        Ok(self)
    }

    /// Runs a further check, failing with this request's context if it errors.
    ///
    /// # Errors
    ///
    /// Fails with the validator's error text.
    pub fn context<F, E>(&mut self, validate: F) -> FailureResult<&mut Self>
    where
        F: FnOnce() -> Result<(), E>,
        E: fmt::Display,
    {
        validate().map_err(|e| self.fail(FailureKind::Validation, e))?;
        Ok(self)
    }

    fn decode(
        &self,
        target: &mut dyn Entity,
        format: BodyFormat,
        body: &mut BodyReader,
    ) -> FailureResult<()> {
        target.decode(format, body).map_err(|e| {
            self.fail(
                FailureKind::Decode,
                format!("unable to decode response as {format}: {e}"),
            )
        })
    }

    fn fail(&self, kind: FailureKind, cause: impl fmt::Display) -> Failure {
        report(
            self.reporter,
            Failure::for_request(kind, &self.method, &self.path, cause),
        )
    }
}

impl<R: FailureReporter + ?Sized> fmt::Debug for Response<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
