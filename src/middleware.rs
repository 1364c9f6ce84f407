//! Actix-Web middleware implementation
//!
//! For every request the middleware records the request facts, calls the
//! downstream service, attaches the response capture, and lets the emitter
//! have the finished record. Capturing never changes what the client receives.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::config::CaptureOptions;
use crate::record::CaptureRecord;
use crate::request_capture::capture_request;
use crate::response_capture::{capture_error_response, capture_response};

/// Request/response capture middleware
///
/// Register it with `.wrap()`:
///
/// ```rust,no_run
/// use actix_web::{web, App, HttpResponse};
/// use jsondump_actix::CaptureMiddleware;
///
/// let app = App::new()
///     .wrap(CaptureMiddleware::new())
///     .route("/", web::get().to(|| async { HttpResponse::Ok().body("hi") }));
/// # let _ = app;
/// ```
pub struct CaptureMiddleware {
    options: Arc<CaptureOptions>,
}

impl CaptureMiddleware {
    /// Capture everything and print each record to stdout
    pub fn new() -> Self {
        Self::with_options(CaptureOptions::new())
    }

    pub fn with_options(options: CaptureOptions) -> Self {
        Self {
            options: options.into_arc(),
        }
    }
}

impl Default for CaptureMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CaptureMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CaptureMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CaptureMiddlewareService {
            service: Rc::new(service),
            options: Arc::clone(&self.options),
        })
    }
}

/// The service that handles each request
pub struct CaptureMiddlewareService<S> {
    service: Rc<S>,
    options: Arc<CaptureOptions>,
}

impl<S, B> Service<ServiceRequest> for CaptureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let options = Arc::clone(&self.options);

        Box::pin(async move {
            let request = capture_request(&mut req, options.fields()).await;
            let record = CaptureRecord {
                request,
                ..Default::default()
            };

            match service.call(req).await {
                Ok(res) => Ok(capture_response(res, record, options)),
                Err(err) => {
                    capture_error_response(&err, record, &options);
                    Err(err)
                }
            }
        })
    }
}
