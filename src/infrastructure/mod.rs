pub mod config;
pub mod cors;
pub mod error;
pub mod extensions;
pub mod persistence;

pub use self::config::Config;
pub use self::cors::CorsPolicy;
pub use self::error::StartupError;
pub use self::extensions::Extensions;
pub use self::persistence::{Database, Migrations};
