use std::fmt;

use sea_orm::DatabaseBackend;

use crate::config::profile::DeploymentProfile;

/// Vendor SQL dialect the ORM speaks for the bound data source.
///
/// `Sqlite` fills the embedded-database role for the `default` profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectAdapter {
    Sqlite,
    Postgres,
    MySql,
}

impl DialectAdapter {
    /// The single dialect paired with each profile.
    pub fn for_profile(profile: DeploymentProfile) -> Self {
        match profile {
            DeploymentProfile::Default => DialectAdapter::Sqlite,
            DeploymentProfile::PostgreSql => DialectAdapter::Postgres,
            DeploymentProfile::MySql => DialectAdapter::MySql,
        }
    }

    pub fn backend(self) -> DatabaseBackend {
        DatabaseBackend::from(self)
    }

    pub fn id(self) -> &'static str {
        match self {
            DialectAdapter::Sqlite => "sqlite",
            DialectAdapter::Postgres => "postgresql",
            DialectAdapter::MySql => "mysql",
        }
    }
}

impl From<DialectAdapter> for DatabaseBackend {
    fn from(dialect: DialectAdapter) -> Self {
        match dialect {
            DialectAdapter::Sqlite => DatabaseBackend::Sqlite,
            DialectAdapter::Postgres => DatabaseBackend::Postgres,
            DialectAdapter::MySql => DatabaseBackend::MySql,
        }
    }
}

impl fmt::Display for DialectAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
