use anyhow::Context;

use gatehouse::{create_app, infrastructure::Config, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  telemetry::init().context("Failed to initialize tracing")?;

  tracing::info!("Starting gatehouse");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let app = create_app(config)
    .await
    .inspect_err(|e| tracing::error!("Startup failed: {}", e))
    .context("Failed to start application")?;

  app.run().await.context("HTTP server terminated with an error")
}
