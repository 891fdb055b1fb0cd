//! In-process handler port

use bytes::Bytes;
use webtest_domain::ResponseRecorder;

/// Port for a request handler dispatched in-process.
///
/// The handler writes its response into the supplied recorder; no socket is
/// involved. Any `FnMut(Request, &mut ResponseRecorder)` closure is a handler.
pub trait Handler {
    /// Serves one request, writing status, headers and body into `recorder`.
    fn serve(&mut self, request: http::Request<Bytes>, recorder: &mut ResponseRecorder);
}

impl<F> Handler for F
where
    F: FnMut(http::Request<Bytes>, &mut ResponseRecorder),
{
    fn serve(&mut self, request: http::Request<Bytes>, recorder: &mut ResponseRecorder) {
        self(request, recorder);
    }
}
