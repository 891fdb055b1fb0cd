//! Failure reporter port

use std::fmt;

use tracing::warn;
use webtest_domain::Failure;

/// Port for reporting a fatal test failure.
///
/// Mirrors what a test harness offers: fail now with a message. The engine
/// calls it exactly once per failing case or request chain and then returns
/// the `Failure` to its caller, so nothing after the report runs whether or
/// not the implementation unwinds.
pub trait FailureReporter {
    /// Reports a failure with a preformatted message.
    fn fail(&self, message: &str);

    /// Reports a failure from format arguments.
    fn fail_fmt(&self, args: fmt::Arguments<'_>) {
        self.fail(&args.to_string());
    }
}

impl<R: FailureReporter + ?Sized> FailureReporter for &R {
    fn fail(&self, message: &str) {
        (**self).fail(message);
    }
}

impl<R: FailureReporter + ?Sized> FailureReporter for Box<R> {
    fn fail(&self, message: &str) {
        (**self).fail(message);
    }
}

/// Funnels a failure through the reporter and hands it back for propagation.
pub(crate) fn report<R: FailureReporter + ?Sized>(reporter: &R, failure: Failure) -> Failure {
    warn!(kind = ?failure.kind(), "{failure}");
    reporter.fail(failure.message());
    failure
}
