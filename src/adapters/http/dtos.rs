use serde::Serialize;

/// Generic success flag returned by stub endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub success: bool,
}

impl SuccessResponse {
  pub fn ok() -> Self {
    Self { success: true }
  }
}

/// Health probe result
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  /// Overall status, "ok" when every dependency answered
  pub status: &'static str,

  /// Database reachability, "up" or "down"
  pub database: &'static str,
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Machine-readable error code
  pub error: String,

  /// Human-readable message
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_success_response_shape() {
    let json = serde_json::to_value(SuccessResponse::ok()).unwrap();
    assert_eq!(json, serde_json::json!({ "success": true }));
  }
}
