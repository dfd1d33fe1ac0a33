use sqlx::migrate::Migrator;

use super::Database;
use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::error::StartupError;

/// Migrations embedded from `./migrations` at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Schema migration manager bound to the application at startup
#[derive(Debug, Clone)]
pub struct Migrations {
  enabled: bool,
}

impl Migrations {
  pub fn new(config: &DatabaseConfig) -> Self {
    Self {
      enabled: config.run_migrations,
    }
  }

  /// Whether [`Migrations::apply`] will touch the database
  pub fn enabled(&self) -> bool {
    self.enabled
  }

  /// Number of migrations compiled into the binary
  pub fn known(&self) -> usize {
    MIGRATOR.iter().count()
  }

  /// Run all pending migrations
  pub async fn apply(&self, db: &Database) -> Result<(), StartupError> {
    if !self.enabled {
      tracing::info!("Database migrations disabled, skipping");
      return Ok(());
    }

    tracing::info!(known = self.known(), "Running database migrations");
    MIGRATOR.run(db.pool()).await.map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      StartupError::Migration(e)
    })?;
    tracing::info!("Database migrations completed");
    Ok(())
  }
}
