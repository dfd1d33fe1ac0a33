use actix_web::{HttpResponse, web};

use crate::adapters::http::{dtos::SuccessResponse, routes::RouteGroup};
use crate::infrastructure::StartupError;

/// Path prefix the auth group is mounted under
pub const PREFIX: &str = "/auth";

/// Auth route group
///
/// # Routes
///
/// - GET /login - Stub login, always succeeds
pub fn routes() -> Result<RouteGroup, StartupError> {
  RouteGroup::new("auth", PREFIX).get("login", "/login", || web::route().to(login_handler))
}

/// Handler for the login stub
///
/// GET /auth/login
/// Response: `{"success": true}` with status 200
pub async fn login_handler() -> HttpResponse {
  HttpResponse::Ok().json(SuccessResponse::ok())
}
