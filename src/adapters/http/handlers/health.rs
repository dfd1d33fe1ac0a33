use actix_web::{HttpResponse, web};

use crate::adapters::http::{dtos::HealthResponse, errors::ApiError};
use crate::infrastructure::Database;

/// Health check endpoint
///
/// GET /health
/// Response: HealthResponse (JSON) with status 200, or 503 when the
/// database does not answer
pub async fn health_handler(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
  db.ping().await.map_err(|e| {
    tracing::debug!("Health check database ping failed: {}", e);
    ApiError::Unavailable("Database is unreachable".to_string())
  })?;

  Ok(HttpResponse::Ok().json(HealthResponse {
    status: "ok",
    database: "up",
  }))
}
