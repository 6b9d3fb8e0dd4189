//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Each request gets a fresh [`TraceId`] in task-local scope, a `trace-id`
//! response header, and one `request completed` log event carrying method,
//! path, status and latency.

use std::future::Future;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Tracing middleware.
///
/// Handlers and domain code read the identifier through
/// [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::middleware::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn attach_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => {
            error!(%error, %trace_id, "failed to encode trace identifier header");
        }
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        let fut = TraceId::sync_scope(trace_id, || self.service.call(req));

        Box::pin(TraceId::scope(trace_id, async move {
            let elapsed_ms = || u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            match fut.await {
                Ok(mut res) => {
                    attach_header(&mut res, trace_id);
                    info!(
                        %trace_id,
                        %method,
                        path = %path,
                        status = res.status().as_u16(),
                        elapsed_ms = elapsed_ms(),
                        "request completed"
                    );
                    Ok(res)
                }
                Err(error) => {
                    warn!(
                        %trace_id,
                        %method,
                        path = %path,
                        %error,
                        elapsed_ms = elapsed_ms(),
                        "request failed before a response was produced"
                    );
                    Err(error)
                }
            }
        }))
    }
}

/// Run `fut` under a fresh trace identifier.
///
/// For work that starts outside a request, such as startup tasks.
pub async fn with_new_trace<Fut>(fut: Fut) -> Fut::Output
where
    Fut: Future,
{
    TraceId::scope(TraceId::generate(), fut).await
}
