//! In-process dispatch of tower services.
//!
//! Adapts any `tower::Service` over HTTP, typically an axum `Router`, to the
//! `Handler` port. Requests never touch a socket: the service is driven to
//! completion on a private current-thread runtime and its response is copied
//! into the recorder.

use std::fmt;

use axum::body::Body;
use bytes::Bytes;
use http_body_util::BodyExt;
use tokio::runtime::{Builder, Runtime};
use tower::{Service, ServiceExt};
use tracing::warn;
use webtest_application::ports::Handler;
use webtest_domain::ResponseRecorder;

use crate::error::HarnessError;

/// `Handler` backed by a tower service.
///
/// A service error or a body that fails mid-stream is recorded as a 500
/// response carrying the error text.
pub struct ServiceHandler<S> {
    service: S,
    runtime: Runtime,
}

impl<S> ServiceHandler<S> {
    /// Wraps `service` with its own single-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be built.
    pub fn new(service: S) -> Result<Self, HarnessError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(HarnessError::Runtime)?;
        Ok(Self { service, runtime })
    }

    /// Returns the wrapped service.
    pub const fn service(&self) -> &S {
        &self.service
    }
}

impl<S> fmt::Debug for ServiceHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandler").finish_non_exhaustive()
    }
}

impl<S, B> Handler for ServiceHandler<S>
where
    S: Service<http::Request<Body>, Response = http::Response<B>>,
    S::Error: fmt::Display,
    B: http_body::Body<Data = Bytes>,
    B::Error: fmt::Display,
{
    fn serve(&mut self, request: http::Request<Bytes>, recorder: &mut ResponseRecorder) {
        let Self { service, runtime } = self;
        let request = request.map(Body::from);

        let outcome = runtime.block_on(async move {
            let response = service
                .ready()
                .await
                .map_err(|e| e.to_string())?
                .call(request)
                .await
                .map_err(|e| e.to_string())?;
            let (parts, body) = response.into_parts();
            let bytes = body.collect().await.map_err(|e| e.to_string())?.to_bytes();
            Ok::<_, String>((parts, bytes))
        });

        match outcome {
            Ok((parts, bytes)) => {
                recorder.set_status(parts.status.as_u16());
                for (name, value) in &parts.headers {
                    recorder.add_header(name.as_str(), value.to_str().unwrap_or("<binary>"));
                }
                recorder.write_body(&bytes);
            }
            Err(message) => {
                warn!(error = %message, "service failed, recording 500");
                recorder.set_status(500);
                recorder.write_body(message.as_bytes());
            }
        }
    }
}
