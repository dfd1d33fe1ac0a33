use actix_web::{Route, http::Method, web};

use crate::infrastructure::StartupError;

/// Builds the handler route for an endpoint; invoked once per worker
pub type RouteFactory = fn() -> Route;

/// One `(method, path, handler)` registration inside a [`RouteGroup`]
#[derive(Debug, Clone)]
pub struct Endpoint {
  pub name: &'static str,
  pub method: Method,
  pub path: &'static str,
  make: RouteFactory,
}

/// A named, path-prefixed collection of endpoints
///
/// Groups are declared with a builder and mounted by the application factory:
///
/// ```no_run
/// use actix_web::{HttpResponse, web};
/// # use gatehouse::adapters::http::routes::RouteGroup;
///
/// async fn ping() -> HttpResponse {
///   HttpResponse::Ok().finish()
/// }
///
/// let group = RouteGroup::new("status", "/status")
///   .get("ping", "/ping", || web::route().to(ping))
///   .expect("valid route");
/// ```
///
/// Every distinct path becomes one actix resource, so a request whose method
/// has no endpoint on a known path is answered 405 rather than 404. The
/// resource takes the `group.endpoint` name of the first endpoint registered
/// on its path; only that name resolves through `HttpRequest::url_for`.
#[derive(Debug, Clone)]
pub struct RouteGroup {
  name: &'static str,
  prefix: &'static str,
  endpoints: Vec<Endpoint>,
}

impl RouteGroup {
  pub fn new(name: &'static str, prefix: &'static str) -> Self {
    Self {
      name,
      prefix,
      endpoints: Vec::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn prefix(&self) -> &'static str {
    self.prefix
  }

  pub fn endpoints(&self) -> &[Endpoint] {
    &self.endpoints
  }

  /// Register a GET endpoint
  pub fn get(
    self,
    name: &'static str,
    path: &'static str,
    make: RouteFactory,
  ) -> Result<Self, StartupError> {
    self.route(Method::GET, name, path, make)
  }

  /// Register an endpoint for `method`
  ///
  /// # Errors
  ///
  /// Returns `StartupError::Routing` if `path` does not start with `/`, or if
  /// the group already has an endpoint with the same method and path or the
  /// same name.
  pub fn route(
    mut self,
    method: Method,
    name: &'static str,
    path: &'static str,
    make: RouteFactory,
  ) -> Result<Self, StartupError> {
    if !path.starts_with('/') {
      return Err(StartupError::Routing(format!(
        "path {path:?} in group {:?} must start with '/'",
        self.name
      )));
    }
    if self
      .endpoints
      .iter()
      .any(|e| e.path == path && e.method == method)
    {
      return Err(StartupError::Routing(format!(
        "{method} {}{path} is registered twice",
        self.prefix
      )));
    }
    if self.endpoints.iter().any(|e| e.name == name) {
      return Err(StartupError::Routing(format!(
        "endpoint {}.{name} is registered twice",
        self.name
      )));
    }

    self.endpoints.push(Endpoint {
      name,
      method,
      path,
      make,
    });
    Ok(self)
  }

  /// Check the group can be mounted
  pub fn validate(&self) -> Result<(), StartupError> {
    if !self.prefix.starts_with('/') || self.prefix.ends_with('/') {
      return Err(StartupError::Routing(format!(
        "prefix {:?} of group {:?} must start with '/' and not end with '/'",
        self.prefix, self.name
      )));
    }
    Ok(())
  }

  /// Full `(method, path, endpoint name)` triples in registration order
  ///
  /// Lists every endpoint name, including those sharing a path with an
  /// earlier endpoint and so not usable with `url_for`.
  pub fn table(&self) -> Vec<(Method, String, String)> {
    self
      .endpoints
      .iter()
      .map(|e| {
        (
          e.method.clone(),
          format!("{}{}", self.prefix, e.path),
          format!("{}.{}", self.name, e.name),
        )
      })
      .collect()
  }

  /// Mount the group as one scope under its prefix, one resource per path
  pub fn configure(&self, cfg: &mut web::ServiceConfig) {
    let mut scope = web::scope(self.prefix);

    let mut paths: Vec<&'static str> = Vec::new();
    for endpoint in &self.endpoints {
      if !paths.contains(&endpoint.path) {
        paths.push(endpoint.path);
      }
    }

    for path in paths {
      let mut on_path = self.endpoints.iter().filter(|e| e.path == path).peekable();
      let first = on_path.peek().map(|e| e.name).unwrap_or(path);

      let mut resource = web::resource(path).name(&format!("{}.{}", self.name, first));
      for endpoint in on_path {
        resource = resource.route((endpoint.make)().method(endpoint.method.clone()));
      }
      scope = scope.service(resource);
    }

    cfg.service(scope);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App, HttpRequest, HttpResponse,
    http::StatusCode,
    test::{self, TestRequest},
  };

  async fn fetch() -> HttpResponse {
    HttpResponse::Ok().body("fetch")
  }

  async fn store() -> HttpResponse {
    HttpResponse::Created().body("store")
  }

  async fn self_link(req: HttpRequest) -> HttpResponse {
    match req.url_for_static("items.list") {
      Ok(url) => HttpResponse::Ok().body(url.path().to_string()),
      Err(_) => HttpResponse::InternalServerError().finish(),
    }
  }

  fn items() -> RouteGroup {
    RouteGroup::new("items", "/items")
      .get("list", "/all", || web::route().to(fetch))
      .unwrap()
      .route(Method::POST, "create", "/all", || web::route().to(store))
      .unwrap()
      .get("link", "/link", || web::route().to(self_link))
      .unwrap()
  }

  #[test]
  fn test_table_joins_prefix() {
    let table = items().table();

    assert_eq!(
      table,
      vec![
        (Method::GET, "/items/all".to_string(), "items.list".to_string()),
        (Method::POST, "/items/all".to_string(), "items.create".to_string()),
        (Method::GET, "/items/link".to_string(), "items.link".to_string()),
      ]
    );
  }

  #[test]
  fn test_rejects_duplicates_and_bad_paths() {
    let group = RouteGroup::new("items", "/items")
      .get("list", "/all", || web::route().to(fetch))
      .unwrap();

    assert!(
      group
        .clone()
        .get("again", "/all", || web::route().to(fetch))
        .is_err()
    );
    assert!(
      group
        .clone()
        .get("list", "/other", || web::route().to(fetch))
        .is_err()
    );
    assert!(group.get("relative", "all", || web::route().to(fetch)).is_err());
  }

  #[test]
  fn test_validate_prefix() {
    assert!(RouteGroup::new("a", "/a").validate().is_ok());
    assert!(RouteGroup::new("a", "a").validate().is_err());
    assert!(RouteGroup::new("a", "/a/").validate().is_err());
  }

  #[actix_web::test]
  async fn test_methods_share_one_resource() {
    let group = items();
    let app = test::init_service(App::new().configure(|cfg| group.configure(cfg))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/items/all").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::post().uri("/items/all").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, TestRequest::delete().uri("/items/all").to_request()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = test::call_service(&app, TestRequest::get().uri("/items/none").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_resources_are_named_after_group() {
    let group = items();
    let app = test::init_service(App::new().configure(|cfg| group.configure(cfg))).await;

    let req = TestRequest::get().uri("/items/link").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, web::Bytes::from_static(b"/items/all"));
  }

  async fn link_to_create(req: HttpRequest) -> HttpResponse {
    match req.url_for_static("items.create") {
      Ok(url) => HttpResponse::Ok().body(url.path().to_string()),
      Err(_) => HttpResponse::NotFound().finish(),
    }
  }

  #[actix_web::test]
  async fn test_later_endpoint_on_shared_path_has_no_url() {
    let group = items()
      .get("create_link", "/create-link", || web::route().to(link_to_create))
      .unwrap();
    assert!(
      group
        .table()
        .iter()
        .any(|(_, path, name)| path == "/items/all" && name == "items.create")
    );

    let app = test::init_service(App::new().configure(|cfg| group.configure(cfg))).await;

    let req = TestRequest::get().uri("/items/create-link").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get().uri("/items/link").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, web::Bytes::from_static(b"/items/all"));
  }
}
