//! Live test server on an ephemeral local port.
//!
//! The server owns a background thread running its own tokio runtime, so
//! blocking transports on the test thread can talk to it.

use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;

use axum::Router;
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::error::HarnessError;

const LOOPBACK: &str = "127.0.0.1:0";

/// A live HTTP server serving an axum `Router` on `127.0.0.1`.
///
/// Dropping the server stops accepting connections, drains in-flight ones
/// and joins the background thread.
///
/// # Example
///
/// ```ignore
/// let server = TestServer::start(router)?;
/// driver.do_request(&reporter, &server.url(), "GET", "/users", RequestBody::none())?;
/// ```
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Binds an ephemeral port and starts serving `router`.
    ///
    /// The listener is bound before this returns, so requests can be issued
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server thread
    /// cannot be started.
    pub fn start(router: Router) -> Result<Self, HarnessError> {
        let bind_error = |source| HarnessError::Bind {
            addr: LOOPBACK.to_string(),
            source,
        };
        let listener = TcpListener::bind(LOOPBACK).map_err(bind_error)?;
        listener.set_nonblocking(true).map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(HarnessError::Runtime)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let thread = std::thread::Builder::new()
            .name(format!("webtest-server-{}", addr.port()))
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = match tokio::net::TcpListener::from_std(listener) {
                        Ok(listener) => listener,
                        Err(e) => {
                            error!(%addr, error = %e, "test server could not adopt listener");
                            return;
                        }
                    };
                    let shutdown = async move {
                        let _ = shutdown_rx.await;
                    };
                    if let Err(e) = axum::serve(listener, router)
                        .with_graceful_shutdown(shutdown)
                        .await
                    {
                        error!(%addr, error = %e, "test server stopped with error");
                    }
                });
            })
            .map_err(HarnessError::Spawn)?;

        debug!(%addr, "test server listening");
        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Returns the base URL, e.g. `http://127.0.0.1:40123`, with no trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns the bound port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns the bound socket address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            error!(addr = %self.addr, "test server thread panicked");
        }
        debug!(addr = %self.addr, "test server stopped");
    }
}
