//! In-memory response sink for in-process handlers.

use std::io::{self, Write};

/// Captures what a handler writes: status, headers and body bytes.
///
/// Mirrors a real response writer without touching the network. The status
/// defaults to 200 until the handler sets another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecorder {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseRecorder {
    /// Creates an empty recorder with status 200.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Returns the recorded status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Sets the status code.
    pub const fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Sets a header, replacing any existing values with the same name (case-insensitive).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Appends a header value without removing existing ones.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Gets the first header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every recorded header in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the Content-Type header, if the handler set one.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Appends bytes to the body buffer.
    pub fn write_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn body_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
