//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the test engine and the outside world:
//! the harness that receives failures, the handler under test and the network.
//! Adapters live in the infrastructure crate.

mod handler;
mod reporter;
mod transport;

pub use handler::Handler;
pub(crate) use reporter::report;
pub use reporter::FailureReporter;
pub use transport::{Transport, TransportError, TransportResponse};
