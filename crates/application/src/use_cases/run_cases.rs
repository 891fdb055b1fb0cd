//! Run Cases Use Case
//!
//! Dispatches a table of declarative cases to an in-process handler, decodes
//! each response by Content-Type and validates it. The first failing case is
//! reported and ends the run.

use tracing::{debug, trace};
use webtest_domain::{BodyFormat, Failure, FailureKind, FailureResult, ResponseRecorder};

use crate::case::{CaseParts, TestCase};
use crate::ports::{FailureReporter, Handler, report};
use crate::request::{build_request, into_buffered};

/// Case runner bound to one in-process handler.
///
/// Cases run strictly in order on the calling thread.
///
/// # Example
///
/// ```ignore
/// let mut runner = CaseRunner::new(ServiceHandler::new(router)?);
/// runner.run(&PanicReporter, cases)?;
/// ```
#[derive(Debug)]
pub struct CaseRunner<H: Handler> {
    handler: H,
}

impl<H: Handler> CaseRunner<H> {
    /// Creates a runner that dispatches to `handler`.
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Runs every case in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first `Failure`, after it has been passed to `reporter`.
    pub fn run<'a, R>(
        &mut self,
        reporter: &R,
        cases: impl IntoIterator<Item = TestCase<'a>>,
    ) -> FailureResult<()>
    where
        R: FailureReporter + ?Sized,
    {
        run(reporter, &mut self.handler, cases)
    }

    /// Returns the handler, e.g. to inspect state it accumulated.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Consumes the runner and returns the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}

/// Runs `cases` against `handler` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first `Failure`, after it has been passed to `reporter`.
pub fn run<'a, R, H>(
    reporter: &R,
    handler: &mut H,
    cases: impl IntoIterator<Item = TestCase<'a>>,
) -> FailureResult<()>
where
    R: FailureReporter + ?Sized,
    H: Handler + ?Sized,
{
    for case in cases {
        run_case(reporter, handler, case)?;
    }
    Ok(())
}

fn run_case<R, H>(reporter: &R, handler: &mut H, case: TestCase<'_>) -> FailureResult<()>
where
    R: FailureReporter + ?Sized,
    H: Handler + ?Sized,
{
    let CaseParts {
        name,
        method,
        url,
        headers,
        body,
        check,
    } = case.into_parts();

    let request = build_request(&method, &url, &headers, body)
        .and_then(into_buffered)
        .map_err(|e| {
            report(
                reporter,
                Failure::for_case(
                    FailureKind::Construction,
                    &name,
                    "unable to create HTTP request",
                    e,
                ),
            )
        })?;

    debug!(case = %name, %method, %url, "dispatching case");
    let mut recorder = ResponseRecorder::new();
    handler.serve(request, &mut recorder);
    debug!(case = %name, status = recorder.status(), "handler responded");

    let Some(mut check) = check else {
        return Ok(());
    };

    let has_validator = check.has_validator();
    if let Some(entity) = check.entity() {
        match BodyFormat::sniff(recorder.content_type()) {
            Some(format) => {
                trace!(case = %name, %format, "decoding response");
                entity.decode_bytes(format, recorder.body()).map_err(|e| {
                    report(
                        reporter,
                        Failure::for_case(
                            FailureKind::Decode,
                            &name,
                            &format!("unable to decode response as {format}"),
                            e,
                        ),
                    )
                })?;
            }
            None if has_validator => {
                return Err(report(
                    reporter,
                    Failure::for_case(
                        FailureKind::MissingContentType,
                        &name,
                        "unable to validate response",
                        "missing Content-Type header",
                    ),
                ));
            }
            None => trace!(case = %name, "no decodable content, skipping decode"),
        }
    }

    check.validate().map_err(|cause| {
        report(
            reporter,
            Failure::for_case(FailureKind::Validation, &name, "validation failed", cause),
        )
    })
}
