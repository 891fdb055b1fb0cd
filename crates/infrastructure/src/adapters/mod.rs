//! Adapters for the application ports.

mod reqwest_transport;
mod service_handler;

pub use reqwest_transport::ReqwestTransport;
pub use service_handler::ServiceHandler;
