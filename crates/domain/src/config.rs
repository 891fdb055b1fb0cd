//! Configuration for the fluent request driver.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Environment variable overriding the request timeout, in milliseconds.
pub const TIMEOUT_ENV_VAR: &str = "WEBTEST_TIMEOUT_MS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings threaded into the driver and its transport.
///
/// Passed explicitly rather than held in shared state, so two tests can use
/// different timeouts without seeing each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Timeout for a whole request, connect through body.
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl DriverConfig {
    /// Creates the default configuration: one minute timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("webtest/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the configuration from the process environment.
    ///
    /// Reads [`TIMEOUT_ENV_VAR`]; an unset variable keeps the default.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` if the variable is set but is not
    /// a whole number of milliseconds.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DriverConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let config = Self::new();
        match lookup(TIMEOUT_ENV_VAR) {
            None => Ok(config),
            Some(raw) => {
                let millis = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::InvalidConfig {
                        key: TIMEOUT_ENV_VAR.to_string(),
                        reason: format!("{e}: {raw:?}"),
                    })?;
                Ok(config.with_timeout(Duration::from_millis(millis)))
            }
        }
    }

    /// Returns the timeout in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
