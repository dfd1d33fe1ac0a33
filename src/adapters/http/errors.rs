use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use super::dtos::ErrorResponse;

/// API error type mapped onto HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// A dependency is unreachable (503 Service Unavailable)
  Unavailable(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (error_type, message) = match self {
      ApiError::Unavailable(msg) => {
        tracing::warn!("Dependency unavailable: {}", msg);
        ("service_unavailable", msg.clone())
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error_type.to_string(),
        message,
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Unavailable("db".to_string()).status_code(),
      StatusCode::SERVICE_UNAVAILABLE
    );
  }

  #[actix_web::test]
  async fn test_unavailable_error_body() {
    let resp = ApiError::Unavailable("database unreachable".to_string()).error_response();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = to_bytes(resp.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "service_unavailable");
    assert_eq!(json["message"], "database unreachable");
  }
}
