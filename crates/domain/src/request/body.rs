//! HTTP Request body types

use std::fmt;
use std::io::Read;

use bytes::Bytes;

use crate::error::{DomainError, DomainResult};

/// Boxed readable stream supplied by the caller as a request body.
pub type BodyReader = Box<dyn Read + Send + 'static>;

/// HTTP request body: nothing, a fixed payload, or a caller-provided stream.
#[derive(Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Fixed byte payload
    Bytes(Bytes),
    /// Stream read when the request is dispatched
    Reader(BodyReader),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::Empty
    }

    /// Creates a body from a fixed string payload.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Bytes(Bytes::from(content.into()))
    }

    /// Creates a body from a readable stream.
    #[must_use]
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Picks the body for a request when both a fixed payload and a stream may be given.
    ///
    /// The stream wins over the payload; with neither the body is empty.
    #[must_use]
    pub fn resolve(payload: Option<Bytes>, reader: Option<BodyReader>) -> Self {
        match (reader, payload) {
            (Some(reader), _) => Self::Reader(reader),
            (None, Some(payload)) => Self::Bytes(payload),
            (None, None) => Self::Empty,
        }
    }

    /// Drains the body into memory.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the stream fails mid-read.
    pub fn into_bytes(self) -> DomainResult<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader
                    .read_to_end(&mut buffer)
                    .map_err(|e| DomainError::InvalidBody(e.to_string()))?;
                Ok(Bytes::from(buffer))
            }
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<&str> for RequestBody {
    fn from(content: &str) -> Self {
        Self::Bytes(Bytes::copy_from_slice(content.as_bytes()))
    }
}

impl From<String> for RequestBody {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(content: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(content))
    }
}

impl From<Bytes> for RequestBody {
    fn from(content: Bytes) -> Self {
        Self::Bytes(content)
    }
}
