//! Log output for tests.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

/// Installs a global `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG` and falls back to `warn`, which shows every reported
/// failure. Output is captured per test like `println!`. Safe to call from
/// every test; only the first call installs anything.
pub fn init_test_logging() {
    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
    if installed.is_ok() {
        tracing::debug!("test logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_test_logging();
        init_test_logging();
        tracing::warn!("still logging after second init");
    }
}
