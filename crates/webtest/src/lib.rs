//! Webtest - HTTP handler testing
//!
//! Two ways to exercise HTTP code from a test:
//!
//! - **Case runner**: a table of [`TestCase`]s dispatched in-process to a
//!   handler (any `FnMut(Request, &mut ResponseRecorder)` or, through
//!   [`ServiceHandler`], an axum `Router`). Each response is decoded by its
//!   Content-Type into a caller-owned entity and validated.
//! - **Fluent driver**: one request at a time over the network, usually
//!   against a [`TestServer`], with chained [`Response::expect`] and
//!   [`Response::context`] checks.
//!
//! Every failure is passed to a [`FailureReporter`] once and returned as
//! `Err(Failure)`, so test code propagates it with `?` or lets
//! [`PanicReporter`] end the test.
//!
//! # Example
//!
//! ```ignore
//! use webtest::prelude::*;
//!
//! let mut user = User::default();
//! let mut runner = CaseRunner::new(ServiceHandler::new(app())?);
//! runner.run(&PanicReporter, [
//!     TestCase::new("retrieve users", "GET", "/users-json")
//!         .validated_entity(&mut user, |u: &User| {
//!             if u.id == "abc" { Ok(()) } else { Err("expected field user.id == 'abc'") }
//!         }),
//! ])?;
//! ```

pub use webtest_application::{
    CaseRunner, DecodeError, Driver, Entity, Expect, FailureReporter, Handler, Response, TestCase,
    Transport, TransportError, TransportResponse, build_request, run,
};
pub use webtest_domain::{
    BodyFormat, BodyReader, DomainError, DriverConfig, Failure, FailureKind, FailureResult,
    RequestBody, ResponseRecorder, TIMEOUT_ENV_VAR,
};
pub use webtest_infrastructure::{
    HarnessError, PanicReporter, RecordingReporter, ReqwestTransport, ServiceHandler, TestServer,
    init_test_logging,
};

/// Creates a fluent driver over the reqwest transport.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn driver(config: DriverConfig) -> Result<Driver<ReqwestTransport>, TransportError> {
    let transport = ReqwestTransport::new(&config)?;
    Ok(Driver::new(transport, config))
}

/// Common imports for test modules.
pub mod prelude {
    pub use crate::{
        CaseRunner, Driver, DriverConfig, Entity, Expect, Failure, FailureKind, FailureReporter,
        FailureResult, Handler, PanicReporter, RecordingReporter, RequestBody, ResponseRecorder,
        ServiceHandler, TestCase, TestServer, driver, init_test_logging, run,
    };
}
