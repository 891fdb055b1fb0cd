//! Webtest Domain - Core test-support types
//!
//! This crate defines the data model shared by the case runner and the
//! fluent driver. All types here are pure Rust with no network I/O.

pub mod config;
pub mod error;
pub mod failure;
pub mod request;
pub mod response;

pub use config::{DriverConfig, TIMEOUT_ENV_VAR};
pub use error::{DomainError, DomainResult};
pub use failure::{Failure, FailureKind, FailureResult};
pub use request::{BodyReader, RequestBody};
pub use response::{BodyFormat, ResponseRecorder};
