//! Application use cases (test engine orchestration).

mod drive_request;
mod run_cases;

pub use drive_request::{Driver, Expect, Response};
pub use run_cases::{CaseRunner, run};
