use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "gatehouse=debug,actix_web=info";

/// `RUST_LOG` if set and parseable, [`DEFAULT_FILTER`] otherwise
pub fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global tracing subscriber
///
/// `log` records (actix-web's `Logger` middleware) are forwarded to tracing.
/// Calling this twice is an error reported by the returned result.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
  tracing_subscriber::registry()
    .with(env_filter())
    .with(tracing_subscriber::fmt::layer())
    .try_init()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_filter_parses() {
    assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
  }
}
