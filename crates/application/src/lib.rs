//! Webtest Application - Test engine and ports
//!
//! This crate holds the two ways of exercising HTTP code under test: the
//! table-driven case runner for in-process handlers and the fluent driver
//! for live servers. Network access and failure presentation sit behind the
//! ports in [`ports`].

pub mod case;
pub mod decode;
pub mod ports;
pub mod request;
pub mod use_cases;

pub use case::TestCase;
pub use decode::{DecodeError, Entity};
pub use ports::{FailureReporter, Handler, Transport, TransportError, TransportResponse};
pub use request::{build_request, into_buffered};
pub use use_cases::{CaseRunner, Driver, Expect, Response, run};
