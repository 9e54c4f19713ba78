//! Per-request correlation and access logging.
//!
//! An incoming `trace-id` header holding a UUID is adopted; otherwise a new
//! identifier is generated. Either way the handler runs inside
//! [`TraceId::scope`], the identifier is echoed on the response, and one log
//! line records the outcome.

use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Wraps an `App` so every request carries a [`TraceId`].
///
/// ```
/// use actix_web::App;
/// use foodgram::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TracedService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, inner: S) -> Self::Future {
        ready(Ok(TracedService {
            inner: Rc::new(inner),
        }))
    }
}

/// The service [`Trace`] installs in front of the application.
pub struct TracedService<S> {
    inner: Rc<S>,
}

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::accept)
}

impl<S, B> Service<ServiceRequest> for TracedService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let inner = Rc::clone(&self.inner);

        Box::pin(trace_id.scope(async move {
            let method = req.method().clone();
            let path = req.path().to_owned();
            let started = Instant::now();

            let mut res = inner.call(req).await?;

            // UUID text is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }

            let status = res.status();
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            if status.is_server_error() {
                warn!(%trace_id, %method, path, status = status.as_u16(), elapsed_ms, "request failed");
            } else {
                info!(%trace_id, %method, path, status = status.as_u16(), elapsed_ms, "request served");
            }
            Ok(res)
        }))
    }
}
