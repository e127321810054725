//! Profile-driven database binding shared by the web app and the migration CLI.
//!
//! The active [`DeploymentProfile`] selects exactly one data-source strategy and
//! one [`DialectAdapter`]; the result is a [`ResourceBinding`] that the rest of
//! the process consumes as a cloneable, pool-backed connection handle.

pub mod config;
pub mod error;
pub mod infra;

pub use config::params::ConnectionParameters;
pub use config::pool::PoolSettings;
pub use config::profile::DeploymentProfile;
pub use error::DbInfraError;
pub use infra::db::binding::{
    activate, active, bind, BindOptions, DataSourceDescriptor, ResourceBinding,
};
pub use infra::db::core::{orchestrate_migration, sanitize_db_url};
pub use infra::db::dialect::DialectAdapter;
pub use infra::db::embedded::{EmbeddedDatabaseBuilder, EmbeddedDatabaseType, SqlScript};
