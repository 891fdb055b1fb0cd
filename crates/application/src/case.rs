//! Declarative request/response expectations for the case runner.

use std::fmt;
use std::io::Read;

use bytes::Bytes;
use webtest_domain::{BodyReader, RequestBody};

use crate::decode::Entity;

/// What the runner should do with a handler's response.
///
/// Boxed so a single table can mix entity types.
pub(crate) trait ResponseCheck {
    /// The decode target, if the case asked for one.
    fn entity(&mut self) -> Option<&mut dyn Entity>;

    /// Whether a validator will run after decoding.
    fn has_validator(&self) -> bool;

    /// Runs the validator, if any.
    fn validate(self: Box<Self>) -> Result<(), String>;
}

struct DecodeOnly<'a, T> {
    target: &'a mut T,
}

impl<T: Entity> ResponseCheck for DecodeOnly<'_, T> {
    fn entity(&mut self) -> Option<&mut dyn Entity> {
        Some(&mut *self.target)
    }

    fn has_validator(&self) -> bool {
        false
    }

    fn validate(self: Box<Self>) -> Result<(), String> {
        Ok(())
    }
}

struct DecodeThenValidate<'a, T, F> {
    target: &'a mut T,
    validate: F,
}

impl<T, F, E> ResponseCheck for DecodeThenValidate<'_, T, F>
where
    T: Entity,
    F: FnOnce(&T) -> Result<(), E>,
    E: fmt::Display,
{
    fn entity(&mut self) -> Option<&mut dyn Entity> {
        Some(&mut *self.target)
    }

    fn has_validator(&self) -> bool {
        true
    }

    fn validate(self: Box<Self>) -> Result<(), String> {
        let Self { target, validate } = *self;
        validate(&*target).map_err(|e| e.to_string())
    }
}

struct ValidateOnly<F> {
    validate: F,
}

impl<F, E> ResponseCheck for ValidateOnly<F>
where
    F: FnOnce() -> Result<(), E>,
    E: fmt::Display,
{
    fn entity(&mut self) -> Option<&mut dyn Entity> {
        None
    }

    fn has_validator(&self) -> bool {
        true
    }

    fn validate(self: Box<Self>) -> Result<(), String> {
        let Self { validate } = *self;
        validate().map_err(|e| e.to_string())
    }
}

/// One declarative expectation: a request to send and what to check in the response.
///
/// # Example
///
/// ```ignore
/// let mut user = User::default();
/// let case = TestCase::new("retrieve users", "GET", "/users-json")
///     .validated_entity(&mut user, |u: &User| {
///         if u.id == "abc" { Ok(()) } else { Err("expected field user.id == 'abc'") }
///     });
/// ```
pub struct TestCase<'a> {
    name: String,
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    body_string: Option<Bytes>,
    body_reader: Option<BodyReader>,
    check: Option<Box<dyn ResponseCheck + 'a>>,
}

impl<'a> TestCase<'a> {
    /// Creates a case with no body and no response checks.
    ///
    /// `name` only labels failure messages and need not be unique.
    #[must_use]
    pub fn new(name: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body_string: None,
            body_reader: None,
            check: None,
        }
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a fixed request body.
    #[must_use]
    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body_string = Some(Bytes::from(body.into()));
        self
    }

    /// Sets a streaming request body. Takes precedence over [`TestCase::body_string`].
    #[must_use]
    pub fn body_reader(mut self, reader: impl Read + Send + 'static) -> Self {
        self.body_reader = Some(Box::new(reader));
        self
    }

    /// Decodes the response into `target` without validating it.
    ///
    /// Useful for "does this parse at all" checks. A response without a
    /// recognizable Content-Type is skipped silently.
    #[must_use]
    pub fn response_entity<T: Entity + 'a>(mut self, target: &'a mut T) -> Self {
        self.check = Some(Box::new(DecodeOnly { target }));
        self
    }

    /// Decodes the response into `target`, then runs `validate` on it.
    ///
    /// A response without a recognizable Content-Type fails the case.
    #[must_use]
    pub fn validated_entity<T, F, E>(mut self, target: &'a mut T, validate: F) -> Self
    where
        T: Entity + 'a,
        F: FnOnce(&T) -> Result<(), E> + 'a,
        E: fmt::Display + 'a,
    {
        self.check = Some(Box::new(DecodeThenValidate { target, validate }));
        self
    }

    /// Runs `validate` without decoding anything, e.g. to check the handler was reached.
    #[must_use]
    pub fn validate<F, E>(mut self, validate: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + 'a,
        E: fmt::Display + 'a,
    {
        self.check = Some(Box::new(ValidateOnly { validate }));
        self
    }

    /// Returns the case label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the request method as given.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request URL as given.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn into_parts(self) -> CaseParts<'a> {
        CaseParts {
            name: self.name,
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: RequestBody::resolve(self.body_string, self.body_reader),
            check: self.check,
        }
    }
}

impl fmt::Debug for TestCase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("has_body", &(self.body_string.is_some() || self.body_reader.is_some()))
            .field("has_check", &self.check.is_some())
            .finish()
    }
}

pub(crate) struct CaseParts<'a> {
    pub name: String,
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub check: Option<Box<dyn ResponseCheck + 'a>>,
}
