#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod infra;
pub mod middleware;
pub mod orm;
pub mod repos;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod views;

#[cfg(test)]
pub mod test_bootstrap;

pub use error::AppError;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::{RequestTrace, StructuredLogger};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
