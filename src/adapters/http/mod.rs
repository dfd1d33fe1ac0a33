pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, HealthResponse, SuccessResponse};
pub use errors::ApiError;
pub use handlers::{auth::login_handler, health::health_handler};
pub use middleware::{RequestId, RequestIdExt, RequestTracing};
pub use routes::{Endpoint, RouteGroup};
