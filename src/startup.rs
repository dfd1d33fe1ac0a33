use actix_web::{
  App, HttpServer,
  body::MessageBody,
  dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse},
  http::Method,
  middleware::Logger,
  web,
};
use std::net::TcpListener;
use std::time::Duration;

use crate::adapters::http::{
  RequestTracing, RouteGroup,
  handlers::{auth, health::health_handler},
};
use crate::infrastructure::{Config, Extensions, StartupError};

/// Path of the health probe, reserved outside every route group
pub const HEALTH_PATH: &str = "/health";

/// A fully configured application, ready to serve
#[derive(Debug, Clone)]
pub struct Application {
  config: Config,
  extensions: Extensions,
  groups: Vec<RouteGroup>,
}

/// Application factory
///
/// Validates `config`, initializes the extensions (database pool, migrations,
/// CORS policy) and registers the route groups, in that order. Any failure
/// aborts startup; nothing is served.
pub async fn create_app(config: Config) -> Result<Application, StartupError> {
  config.validate()?;
  tracing::info!("Configuration validated");

  let extensions = Extensions::init(&config).await?;
  tracing::info!("Extensions initialized");

  Application::assemble(config, extensions)
}

impl Application {
  /// Register the route groups on top of already initialized extensions
  pub fn assemble(config: Config, extensions: Extensions) -> Result<Self, StartupError> {
    let mut app = Self {
      config,
      extensions,
      groups: Vec::new(),
    };
    app.register(auth::routes()?)?;
    Ok(app)
  }

  /// Add a route group
  ///
  /// # Errors
  ///
  /// Returns `StartupError::Routing` if the group is malformed or its name or
  /// prefix is already taken.
  pub fn register(&mut self, group: RouteGroup) -> Result<(), StartupError> {
    group.validate()?;

    if self.groups.iter().any(|g| g.name() == group.name()) {
      return Err(StartupError::Routing(format!(
        "route group {:?} is registered twice",
        group.name()
      )));
    }
    if group.prefix() == HEALTH_PATH || self.groups.iter().any(|g| g.prefix() == group.prefix()) {
      return Err(StartupError::Routing(format!(
        "prefix {:?} of route group {:?} is already in use",
        group.prefix(),
        group.name()
      )));
    }

    tracing::info!(
      group = group.name(),
      prefix = group.prefix(),
      endpoints = group.endpoints().len(),
      "Registered route group"
    );
    self.groups.push(group);
    Ok(())
  }

  /// Every `(method, path, endpoint name)` the application answers
  pub fn route_table(&self) -> Vec<(Method, String, String)> {
    let mut table = vec![(Method::GET, HEALTH_PATH.to_string(), "health".to_string())];
    table.extend(self.groups.iter().flat_map(RouteGroup::table));
    table
  }

  /// Build the actix application: extensions attached, groups mounted
  pub fn router(
    self,
  ) -> App<
    impl ServiceFactory<
      ServiceRequest,
      Config = (),
      Response = ServiceResponse<impl MessageBody>,
      Error = actix_web::Error,
      InitError = (),
    >,
  > {
    let groups = self.groups;

    App::new()
      .app_data(web::Data::new(self.extensions.database))
      .wrap(self.extensions.cors.middleware())
      .wrap(Logger::default())
      .wrap(RequestTracing::new())
      .route(HEALTH_PATH, web::get().to(health_handler))
      .configure(move |cfg| {
        for group in &groups {
          group.configure(cfg);
        }
      })
  }

  /// Start serving on an already bound listener
  pub fn serve(self, listener: TcpListener) -> Result<Server, StartupError> {
    let server_config = self.config.server.clone();

    let mut server = HttpServer::new(move || self.clone().router())
      .shutdown_timeout(server_config.shutdown_timeout_seconds);
    if let Some(workers) = server_config.workers {
      server = server.workers(workers);
    }

    Ok(server.listen(listener)?.run())
  }

  /// Bind the configured address and serve until shutdown
  pub async fn run(self) -> Result<(), StartupError> {
    let host = self.config.server.host.clone();
    let port = self.config.server.port;
    let database = self.extensions.database.clone();

    let listener = TcpListener::bind((host.as_str(), port)).inspect_err(|e| {
      tracing::error!("Failed to bind {}:{}: {}", host, port, e);
    })?;
    tracing::info!("Starting HTTP server on {}:{}", host, port);

    let result = self.serve(listener)?.await;

    tracing::info!("HTTP server stopped");
    tokio::time::timeout(Duration::from_secs(5), database.close())
      .await
      .ok();
    result.map_err(StartupError::from)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    http::StatusCode,
    test::{self, TestRequest},
  };

  fn config() -> Config {
    toml::from_str(
      r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [database]
        url = "postgres://nobody@127.0.0.1:1/none"
        connect_timeout_seconds = 1
        acquire_timeout_seconds = 1
      "#,
    )
    .expect("Failed to parse config")
  }

  fn assembled() -> Application {
    let config = config();
    let extensions = Extensions::detached(&config).unwrap();
    Application::assemble(config, extensions).unwrap()
  }

  async fn noop() -> actix_web::HttpResponse {
    actix_web::HttpResponse::NoContent().finish()
  }

  #[actix_web::test]
  async fn test_route_table_exposes_login() {
    let table = assembled().route_table();

    assert!(table.contains(&(
      Method::GET,
      "/auth/login".to_string(),
      "auth.login".to_string()
    )));
  }

  #[actix_web::test]
  async fn test_assembly_is_repeatable() {
    assert_eq!(assembled().route_table(), assembled().route_table());
  }

  #[actix_web::test]
  async fn test_register_rejects_taken_name_and_prefix() {
    let mut app = assembled();

    let same_name = RouteGroup::new("auth", "/other");
    assert!(matches!(app.register(same_name), Err(StartupError::Routing(_))));

    let same_prefix = RouteGroup::new("accounts", "/auth");
    assert!(app.register(same_prefix).is_err());

    let health = RouteGroup::new("probe", HEALTH_PATH);
    assert!(app.register(health).is_err());

    let fresh = RouteGroup::new("admin", "/admin")
      .get("noop", "/noop", || web::route().to(noop))
      .unwrap();
    assert!(app.register(fresh).is_ok());
    assert!(
      app
        .route_table()
        .iter()
        .any(|(_, path, _)| path == "/admin/noop")
    );
  }

  #[actix_web::test]
  async fn test_router_serves_registered_groups() {
    let app = test::init_service(assembled().router()).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/auth/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = test::call_service(&app, TestRequest::post().uri("/auth/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = test::call_service(
      &app,
      TestRequest::get().uri("/auth/nonexistent").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_factory_rejects_invalid_config_before_connecting() {
    let mut config = config();
    config.database.url = "sqlite://gatehouse.db".into();

    let result = create_app(config).await;
    assert!(matches!(result, Err(StartupError::InvalidConfig(_))));
  }

  #[tokio::test]
  async fn test_factory_fails_fast_on_unreachable_database() {
    let result = create_app(config()).await;

    assert!(matches!(
      result,
      Err(StartupError::Database(_)) | Err(StartupError::DatabaseTimeout { .. })
    ));
  }
}
