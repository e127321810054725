//! Profile resolver and resource binder.
//!
//! `bind` dispatches once from the profile to its [`DataSourceStrategy`] and
//! pairs the resulting handle with the profile's dialect. `activate` stores the
//! binding in a process-wide slot so the whole process shares one handle.

use std::process;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::params::{required_keys, ConnectionParameters, URL};
use crate::config::pool::PoolSettings;
use crate::config::profile::DeploymentProfile;
use crate::error::DbInfraError;
use crate::infra::db::core::sanitize_db_url;
use crate::infra::db::dialect::DialectAdapter;
use crate::infra::db::embedded::{EmbeddedDatabaseBuilder, EmbeddedDatabaseType, SqlScript};
use crate::infra::db::pooled::{mysql_pool, postgres_pool, MYSQL_VALIDATION_QUERY};

/// Inputs to binding that are not connection parameters.
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    pub pool: PoolSettings,
    /// Init scripts for the `default` profile, applied in order.
    pub dev_scripts: Vec<SqlScript>,
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, pool: PoolSettings) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_dev_script(mut self, script: SqlScript) -> Self {
        self.dev_scripts.push(script);
        self
    }
}

/// What was bound, without secrets. Safe to log or expose on a health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    pub engine: &'static str,
    pub target: String,
    pub driver: Option<String>,
    pub validation_query: Option<&'static str>,
    pub pool_min: u32,
    pub pool_max: u32,
    pub init_scripts: Vec<String>,
}

/// The one active pairing of connection handle and dialect for this process.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    profile: DeploymentProfile,
    dialect: DialectAdapter,
    conn: DatabaseConnection,
    descriptor: DataSourceDescriptor,
}

impl ResourceBinding {
    pub fn profile(&self) -> DeploymentProfile {
        self.profile
    }

    pub fn dialect(&self) -> DialectAdapter {
        self.dialect
    }

    /// Pool-backed handle; clones share the same pool.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn descriptor(&self) -> &DataSourceDescriptor {
        &self.descriptor
    }
}

#[async_trait]
trait DataSourceStrategy: Send + Sync {
    async fn construct(
        &self,
        params: &ConnectionParameters,
        options: &BindOptions,
    ) -> Result<(DatabaseConnection, DataSourceDescriptor), DbInfraError>;
}

struct EmbeddedStrategy;
struct PostgresStrategy;
struct MySqlStrategy;

#[async_trait]
impl DataSourceStrategy for EmbeddedStrategy {
    async fn construct(
        &self,
        _params: &ConnectionParameters,
        options: &BindOptions,
    ) -> Result<(DatabaseConnection, DataSourceDescriptor), DbInfraError> {
        if options.dev_scripts.is_empty() {
            warn!("bind=embedded scripts=0 (database will start empty)");
        }
        let builder = EmbeddedDatabaseBuilder::new()
            .set_type(EmbeddedDatabaseType::Sqlite)
            .add_scripts(options.dev_scripts.iter().cloned());
        let init_scripts = builder.script_names();
        let conn = builder.build().await?;

        let descriptor = DataSourceDescriptor {
            engine: "sqlite",
            target: "sqlite::memory:".to_string(),
            driver: None,
            validation_query: None,
            pool_min: 1,
            pool_max: 1,
            init_scripts,
        };
        Ok((conn, descriptor))
    }
}

#[async_trait]
impl DataSourceStrategy for PostgresStrategy {
    async fn construct(
        &self,
        params: &ConnectionParameters,
        options: &BindOptions,
    ) -> Result<(DatabaseConnection, DataSourceDescriptor), DbInfraError> {
        let (conn, target) = postgres_pool(params, &options.pool)?;
        let descriptor = DataSourceDescriptor {
            engine: "postgresql",
            target: target.display(),
            driver: None,
            validation_query: None,
            pool_min: options.pool.pool_min,
            pool_max: options.pool.pool_max,
            init_scripts: Vec::new(),
        };
        Ok((conn, descriptor))
    }
}

#[async_trait]
impl DataSourceStrategy for MySqlStrategy {
    async fn construct(
        &self,
        params: &ConnectionParameters,
        options: &BindOptions,
    ) -> Result<(DatabaseConnection, DataSourceDescriptor), DbInfraError> {
        let (conn, driver) = mysql_pool(params, &options.pool)?;
        let descriptor = DataSourceDescriptor {
            engine: "mysql",
            target: sanitize_db_url(params.get(URL).unwrap_or_default()),
            driver: Some(driver),
            validation_query: Some(MYSQL_VALIDATION_QUERY),
            pool_min: options.pool.pool_min,
            pool_max: options.pool.pool_max,
            init_scripts: Vec::new(),
        };
        Ok((conn, descriptor))
    }
}

fn strategy_for(profile: DeploymentProfile) -> &'static dyn DataSourceStrategy {
    match profile {
        DeploymentProfile::Default => &EmbeddedStrategy,
        DeploymentProfile::PostgreSql => &PostgresStrategy,
        DeploymentProfile::MySql => &MySqlStrategy,
    }
}

/// Build a fresh binding for `profile`. Never memoized; see [`activate`].
///
/// Required parameters are checked before any resource is created, so a
/// configuration error never leaves a half-built handle behind.
pub async fn bind(
    profile: DeploymentProfile,
    params: &ConnectionParameters,
    options: &BindOptions,
) -> Result<ResourceBinding, DbInfraError> {
    params.ensure_present(required_keys(profile))?;
    if profile.is_server() {
        options.pool.validate()?;
    }

    let dialect = DialectAdapter::for_profile(profile);
    info!(
        "bind=start profile={} dialect={} pid={}",
        profile,
        dialect,
        process::id()
    );

    let (conn, descriptor) = strategy_for(profile).construct(params, options).await?;

    let backend = conn.get_database_backend();
    if backend != dialect.backend() {
        return Err(DbInfraError::config(format!(
            "profile {profile} produced a {backend:?} handle but expects the {dialect} dialect"
        )));
    }

    info!(
        "bind=ready profile={} dialect={} engine={} target={}",
        profile, dialect, descriptor.engine, descriptor.target
    );

    Ok(ResourceBinding {
        profile,
        dialect,
        conn,
        descriptor,
    })
}

static ACTIVE: OnceCell<ResourceBinding> = OnceCell::const_new();

/// Bind once for the life of the process.
///
/// Later calls with the same profile return the existing binding; a call with a
/// different profile fails, since two profiles' bindings must never coexist.
pub async fn activate(
    profile: DeploymentProfile,
    params: &ConnectionParameters,
    options: &BindOptions,
) -> Result<&'static ResourceBinding, DbInfraError> {
    let binding = ACTIVE
        .get_or_try_init(|| bind(profile, params, options))
        .await?;
    if binding.profile != profile {
        return Err(DbInfraError::config(format!(
            "profile '{}' is already active; refusing to bind '{profile}'",
            binding.profile
        )));
    }
    Ok(binding)
}

/// The process-wide binding, if `activate` has succeeded.
pub fn active() -> Option<&'static ResourceBinding> {
    ACTIVE.get()
}
