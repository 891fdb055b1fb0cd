//! Webtest Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the live test server.

pub mod adapters;
pub mod error;
pub mod logging;
pub mod reporters;
pub mod server;

pub use adapters::{ReqwestTransport, ServiceHandler};
pub use error::HarnessError;
pub use logging::init_test_logging;
pub use reporters::{PanicReporter, RecordingReporter};
pub use server::TestServer;
