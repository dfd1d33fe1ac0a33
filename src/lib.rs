pub mod adapters;
pub mod infrastructure;
pub mod startup;
pub mod telemetry;

pub use startup::{Application, create_app};
