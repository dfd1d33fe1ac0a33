use actix_cors::Cors;

use super::config::CorsConfig;

/// Cross-origin policy shared by all workers
///
/// `actix_cors::Cors` is built per worker, so the policy keeps the settings
/// and hands out a fresh middleware from [`CorsPolicy::middleware`].
#[derive(Debug, Clone)]
pub struct CorsPolicy {
  config: CorsConfig,
}

impl CorsPolicy {
  pub fn new(config: &CorsConfig) -> Self {
    match (config.allows_any_origin(), config.allowed_origins.len()) {
      (true, _) => tracing::info!("CORS allows any origin"),
      (false, 0) => tracing::warn!("CORS has no allowed origins, only same-origin requests succeed"),
      (false, _) => tracing::info!("CORS allowed origins: {:?}", config.allowed_origins),
    }

    Self {
      config: config.clone(),
    }
  }

  pub fn middleware(&self) -> Cors {
    let config = &self.config;

    let mut cors = if config.allows_any_origin() {
      Cors::default().allow_any_origin().send_wildcard()
    } else {
      config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = if config.allowed_methods.is_empty() {
      cors.allow_any_method()
    } else {
      cors.allowed_methods(config.allowed_methods.iter().map(String::as_str))
    };

    cors = if config.allowed_headers.is_empty() {
      cors.allow_any_header()
    } else {
      cors.allowed_headers(config.allowed_headers.iter().map(String::as_str))
    };

    if !config.expose_headers.is_empty() {
      cors = cors.expose_headers(config.expose_headers.iter().map(String::as_str));
    }
    if config.supports_credentials {
      cors = cors.supports_credentials();
    }

    cors.max_age(config.max_age_seconds)
  }
}
