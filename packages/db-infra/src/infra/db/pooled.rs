//! Pooled connection handles for the server profiles.
//!
//! Both constructors build the pool lazily: no connection is opened until the
//! first acquire, so binding succeeds even while the server is still starting.

use std::str::FromStr;

use sea_orm::{DatabaseConnection, SqlxMySqlConnector, SqlxPostgresConnector};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{info, warn};

use crate::config::params::{
    ConnectionParameters, DATABASE_NAME, DRIVER_CLASS, PASSWORD, SERVER_NAME, URL, USER, USERNAME,
};
use crate::config::pool::PoolSettings;
use crate::error::DbInfraError;
use crate::infra::db::core::sanitize_db_url;

/// Driver used when `db.driverClass` is not set.
pub const DEFAULT_MYSQL_DRIVER: &str = "mysql";

/// Driver identifiers served by the sqlx MySQL driver.
pub const SUPPORTED_MYSQL_DRIVERS: [&str; 2] = ["mysql", "mariadb"];

/// JDBC driver class names accepted in `db.driverClass`, with the identifier each maps to.
pub const MYSQL_DRIVER_CLASS_ALIASES: [(&str, &str); 3] = [
    ("com.mysql.jdbc.Driver", "mysql"),
    ("com.mysql.cj.jdbc.Driver", "mysql"),
    ("org.mariadb.jdbc.Driver", "mariadb"),
];

/// Liveness check run on every MySQL acquire; failing connections are evicted.
pub const MYSQL_VALIDATION_QUERY: &str = "SELECT 1";

const APPLICATION_NAME: &str = "example-web";

/// Connection target for PostgreSQL; `servername` may carry a `:port` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresTarget {
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    pub user: String,
}

impl PostgresTarget {
    pub fn display(&self) -> String {
        match self.port {
            Some(port) => format!("postgresql://{}@{}:{}/{}", self.user, self.host, port, self.database),
            None => format!("postgresql://{}@{}/{}", self.user, self.host, self.database),
        }
    }
}

/// Accepts `host`, `host:port`, `[v6]`, `[v6]:port` and a bare IPv6 literal.
fn split_host_port(server: &str) -> (String, Option<u16>) {
    if let Some(rest) = server.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse::<u16>().ok());
            return (host.to_string(), port);
        }
    }
    // More than one colon without brackets can only be an IPv6 address.
    if server.matches(':').count() > 1 {
        return (server.to_string(), None);
    }
    if let Some((host, port)) = server.rsplit_once(':') {
        if let Ok(port) = port.parse::<u16>() {
            return (host.to_string(), Some(port));
        }
    }
    (server.to_string(), None)
}

pub fn postgres_target(params: &ConnectionParameters) -> Result<PostgresTarget, DbInfraError> {
    let (host, port) = split_host_port(params.required(SERVER_NAME)?);
    Ok(PostgresTarget {
        host,
        port,
        database: params.required(DATABASE_NAME)?.to_string(),
        user: params.required(USER)?.to_string(),
    })
}

pub fn postgres_pool(
    params: &ConnectionParameters,
    settings: &PoolSettings,
) -> Result<(DatabaseConnection, PostgresTarget), DbInfraError> {
    let target = postgres_target(params)?;

    let mut connect_opts = PgConnectOptions::new()
        .host(&target.host)
        .database(&target.database)
        .username(&target.user)
        .password(params.required(PASSWORD)?)
        .application_name(APPLICATION_NAME);
    if let Some(port) = target.port {
        connect_opts = connect_opts.port(port);
    }

    let pool = PgPoolOptions::new()
        .min_connections(settings.pool_min)
        .max_connections(settings.pool_max)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .connect_lazy_with(connect_opts);

    info!(
        "pool=create engine=postgres target={} min={} max={} acquire_timeout_ms={}",
        target.display(),
        settings.pool_min,
        settings.pool_max,
        settings.acquire_timeout_ms
    );

    Ok((SqlxPostgresConnector::from_sqlx_postgres_pool(pool), target))
}

/// Resolved MySQL driver identifier, substituting the default when unset.
pub fn mysql_driver(params: &ConnectionParameters) -> Result<String, DbInfraError> {
    let configured = params.get_or(DRIVER_CLASS, DEFAULT_MYSQL_DRIVER);
    let driver = MYSQL_DRIVER_CLASS_ALIASES
        .iter()
        .find(|(class, _)| *class == configured)
        .map_or(configured, |(_, id)| *id);
    if SUPPORTED_MYSQL_DRIVERS.contains(&driver) {
        Ok(driver.to_string())
    } else {
        Err(DbInfraError::config(format!(
            "unsupported MySQL driver '{configured}' (supported: {})",
            SUPPORTED_MYSQL_DRIVERS.join(", ")
        )))
    }
}

fn mysql_connect_options(url: &str) -> Result<MySqlConnectOptions, DbInfraError> {
    let normalized = if let Some(rest) = url.strip_prefix("mariadb://") {
        format!("mysql://{rest}")
    } else if url.starts_with("mysql://") {
        url.to_string()
    } else {
        return Err(DbInfraError::config(format!(
            "db.url must start with mysql:// or mariadb://, got '{}'",
            sanitize_db_url(url)
        )));
    };
    MySqlConnectOptions::from_str(&normalized).map_err(|e| {
        DbInfraError::config(format!(
            "invalid db.url '{}': {e}",
            sanitize_db_url(url)
        ))
    })
}

pub fn mysql_pool(
    params: &ConnectionParameters,
    settings: &PoolSettings,
) -> Result<(DatabaseConnection, String), DbInfraError> {
    let url = params.required(URL)?;
    let driver = mysql_driver(params)?;
    let connect_opts = mysql_connect_options(url)?
        .username(params.required(USERNAME)?)
        .password(params.required(PASSWORD)?);

    let pool = MySqlPoolOptions::new()
        .min_connections(settings.pool_min)
        .max_connections(settings.pool_max)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .test_before_acquire(false)
        .before_acquire(|conn, _meta| {
            Box::pin(async move {
                match sqlx::query(MYSQL_VALIDATION_QUERY).execute(&mut *conn).await {
                    Ok(_) => Ok(true),
                    Err(e) => {
                        warn!(error = %e, "pool=validation_failed engine=mysql action=evict");
                        Ok(false)
                    }
                }
            })
        })
        .connect_lazy_with(connect_opts);

    info!(
        "pool=create engine=mysql target={} driver={} validation_query=\"{}\" min={} max={}",
        sanitize_db_url(url),
        driver,
        MYSQL_VALIDATION_QUERY,
        settings.pool_min,
        settings.pool_max
    );

    Ok((SqlxMySqlConnector::from_sqlx_mysql_pool(pool), driver))
}
