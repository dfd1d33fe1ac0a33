use actix_web::{
  Error, HttpMessage,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  time::Instant,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags every request with an ID and runs it inside a tracing span
///
/// An incoming `X-Request-ID` that parses as a UUID is kept so IDs survive a
/// proxy hop; anything else is replaced with a fresh v4 UUID. The ID is stored
/// in request extensions, echoed in the response header and recorded on the
/// `request` span together with the method and path. Completion is logged
/// with status and latency.
#[derive(Debug, Clone, Default)]
pub struct RequestTracing;

impl RequestTracing {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTracing
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RequestTracingService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RequestTracingService {
      service: Rc::new(service),
    }))
  }
}

pub struct RequestTracingService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestTracingService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    let request_id = req
      .headers()
      .get(&REQUEST_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| Uuid::parse_str(v).ok())
      .map(RequestId)
      .unwrap_or_default();
    req.extensions_mut().insert(request_id);

    let span = tracing::info_span!(
      "request",
      request_id = %request_id,
      method = %req.method(),
      path = %req.path(),
    );

    Box::pin(
      async move {
        let started = Instant::now();
        let mut res = service.call(req).await?;

        tracing::info!(
          status = res.status().as_u16(),
          elapsed_ms = started.elapsed().as_millis() as u64,
          "request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
          res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Ok(res)
      }
      .instrument(span),
    )
  }
}

/// Request identifier stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for RequestId {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Display for RequestId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Extension trait to read the request ID from a request
pub trait RequestIdExt {
  /// `None` when [`RequestTracing`] is not installed
  fn request_id(&self) -> Option<RequestId>;
}

impl RequestIdExt for actix_web::HttpRequest {
  fn request_id(&self) -> Option<RequestId> {
    self.extensions().get::<RequestId>().copied()
  }
}
