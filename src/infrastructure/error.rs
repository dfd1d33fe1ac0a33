use thiserror::Error;

/// Errors that stop the application before it starts serving
#[derive(Debug, Error)]
pub enum StartupError {
  #[error("Failed to load configuration: {0}")]
  Config(#[from] config::ConfigError),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Database connection timed out after {seconds} seconds")]
  DatabaseTimeout { seconds: u64 },

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Failed to run database migrations: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Invalid route registration: {0}")]
  Routing(String),

  #[error("Server I/O error: {0}")]
  Io(#[from] std::io::Error),
}
