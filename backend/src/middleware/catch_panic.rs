//! Panic isolation for request handlers.
//!
//! A panic while building or polling a handler future is turned into an
//! internal [`DomainError`] which renders as a 500 response with the standard
//! redacted error body. The worker keeps serving.
//!
//! No `HttpRequest` clone is held across the inner call: the router needs
//! exclusive access to the request while it records path parameters.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use actix_web::http::Method;
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::Error as DomainError;

/// Middleware converting handler panics into 500 responses.
///
/// Register it inside [`Trace`](crate::middleware::Trace) so panic responses
/// still carry a trace identifier.
///
/// ```
/// use actix_web::App;
/// use users_api::middleware::{CatchPanic, Trace};
///
/// let app = App::new().wrap(CatchPanic).wrap(Trace);
/// ```
#[derive(Clone, Copy, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CatchPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicMiddleware { service }))
    }
}

/// Service wrapper produced by [`CatchPanic`].
pub struct CatchPanicMiddleware<S> {
    service: S,
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

fn panic_error(method: &Method, path: &str, payload: &(dyn Any + Send)) -> Error {
    let detail = panic_detail(payload);
    error!(panic = %detail, method = %method, path, "handler panicked");
    DomainError::internal(format!("handler panicked: {detail}")).into()
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_owned();
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(ready(Err(panic_error(&method, &path, payload.as_ref()))));
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result.map(ServiceResponse::map_into_boxed_body),
                Err(payload) => Err(panic_error(&method, &path, payload.as_ref())),
            }
        })
    }
}
