use super::config::Config;
use super::cors::CorsPolicy;
use super::error::StartupError;
use super::persistence::{Database, Migrations};

/// Long-lived services attached to the application once at startup
///
/// Handles are passed explicitly into the application factory and exposed to
/// handlers through `web::Data`; nothing here is a global.
#[derive(Debug, Clone)]
pub struct Extensions {
  pub database: Database,
  pub migrations: Migrations,
  pub cors: CorsPolicy,
}

impl Extensions {
  /// Connect to the database, apply migrations and build the CORS policy
  ///
  /// `config` must already be validated.
  pub async fn init(config: &Config) -> Result<Self, StartupError> {
    let database = Database::connect(&config.database).await?;
    let migrations = Migrations::new(&config.database);
    migrations.apply(&database).await?;
    let cors = CorsPolicy::new(&config.cors);

    Ok(Self {
      database,
      migrations,
      cors,
    })
  }

  /// Same handles as [`Extensions::init`] without any network access: the
  /// pool connects on first use and migrations are left unapplied.
  pub fn detached(config: &Config) -> Result<Self, StartupError> {
    Ok(Self {
      database: Database::connect_lazy(&config.database)?,
      migrations: Migrations::new(&config.database),
      cors: CorsPolicy::new(&config.cors),
    })
  }
}
