pub mod binding;
pub mod core;
pub mod dialect;
pub mod embedded;
pub mod pooled;

pub use binding::{activate, active, bind, BindOptions, ResourceBinding};
pub use self::core::{orchestrate_migration, retry_connection, sanitize_db_url};
pub use dialect::DialectAdapter;
