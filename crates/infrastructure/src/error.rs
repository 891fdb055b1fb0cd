//! Infrastructure error types.

use std::io;

use thiserror::Error;

/// Errors raised while setting up in-process or live test targets.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The private async runtime could not be built.
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] io::Error),

    /// The test server could not bind its listener.
    #[error("failed to bind test server to {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The server thread could not be started.
    #[error("failed to spawn test server thread: {0}")]
    Spawn(#[source] io::Error),
}
