//! Failure reporter implementations.

use parking_lot::Mutex;
use webtest_application::ports::FailureReporter;

/// Reporter that panics with the failure message.
///
/// Inside a `#[test]` this fails the test the same way an assertion does.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    #[allow(clippy::panic)]
    fn fail(&self, message: &str) {
        panic!("{message}");
    }
}

/// Reporter that records every message instead of aborting.
///
/// Used to test the test code: run a case that should fail, then assert on
/// what was reported.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every reported message, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl FailureReporter for RecordingReporter {
    fn fail(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
