use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::error::StartupError;

/// PostgreSQL connection pool shared by every worker
///
/// Cloning is cheap: clones share the same underlying pool.
#[derive(Debug, Clone)]
pub struct Database {
  pool: PgPool,
}

impl Database {
  /// Connect eagerly, failing if the server cannot be reached within
  /// `connect_timeout_seconds`.
  pub async fn connect(config: &DatabaseConfig) -> Result<Self, StartupError> {
    tracing::info!(
      url = %config.redacted_url(),
      max_connections = config.max_connections,
      "Connecting to database"
    );

    let pool = tokio::time::timeout(
      Duration::from_secs(config.connect_timeout_seconds),
      pool_options(config).connect(&config.url),
    )
    .await
    .map_err(|_| {
      tracing::error!(
        "Database connection timed out after {} seconds. Is PostgreSQL running?",
        config.connect_timeout_seconds
      );
      StartupError::DatabaseTimeout {
        seconds: config.connect_timeout_seconds,
      }
    })?
    .map_err(|e| {
      tracing::error!("Failed to connect to database at {}: {}", config.redacted_url(), e);
      StartupError::Database(e)
    })?;

    tracing::info!("Database connection pool created");
    Ok(Self { pool })
  }

  /// Build the pool without opening a connection; only the URL is checked.
  pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, StartupError> {
    let pool = pool_options(config).connect_lazy(&config.url)?;
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Round-trip a trivial query through the pool
  pub async fn ping(&self) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  pub async fn close(&self) {
    self.pool.close().await;
    tracing::info!("Database connection pool closed");
  }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
  let options = PgPoolOptions::new()
    .max_connections(config.max_connections)
    .min_connections(config.min_connections)
    .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

  match config.idle_timeout_seconds {
    Some(seconds) => options.idle_timeout(Duration::from_secs(seconds)),
    None => options,
  }
}
