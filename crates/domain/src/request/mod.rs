//! Request-side types

mod body;

pub use body::{BodyReader, RequestBody};
