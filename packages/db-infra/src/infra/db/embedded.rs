use std::fs;
use std::path::Path;
use std::str::FromStr;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, error, info};

use crate::error::DbInfraError;

/// Engine behind an embedded database. SQLite is the only in-process engine wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedDatabaseType {
    Sqlite,
}

/// A named block of SQL applied to an embedded database at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlScript {
    pub name: String,
    pub sql: String,
}

impl SqlScript {
    pub fn inline(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DbInfraError> {
        let path = path.as_ref();
        let sql = fs::read_to_string(path).map_err(|e| {
            DbInfraError::config(format!(
                "failed to read SQL script '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self::inline(path.display().to_string(), sql))
    }
}

/// Builds a disposable in-process database and runs its init scripts in order.
#[derive(Debug, Clone)]
pub struct EmbeddedDatabaseBuilder {
    db_type: EmbeddedDatabaseType,
    scripts: Vec<SqlScript>,
}

impl Default for EmbeddedDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            db_type: EmbeddedDatabaseType::Sqlite,
            scripts: Vec::new(),
        }
    }

    pub fn set_type(mut self, db_type: EmbeddedDatabaseType) -> Self {
        self.db_type = db_type;
        self
    }

    pub fn add_script(mut self, script: SqlScript) -> Self {
        self.scripts.push(script);
        self
    }

    pub fn add_scripts(mut self, scripts: impl IntoIterator<Item = SqlScript>) -> Self {
        self.scripts.extend(scripts);
        self
    }

    pub fn script_names(&self) -> Vec<String> {
        self.scripts.iter().map(|s| s.name.clone()).collect()
    }

    /// Every call yields a brand-new database; nothing is shared with earlier builds.
    pub async fn build(self) -> Result<DatabaseConnection, DbInfraError> {
        let spec = match self.db_type {
            EmbeddedDatabaseType::Sqlite => "sqlite::memory:",
        };

        // sqlx gives each parsed `:memory:` spec its own uniquely named database.
        let connect_opts = SqliteConnectOptions::from_str(spec)?.foreign_keys(true);

        // One pinned connection: the database dies with its last connection.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;

        for script in &self.scripts {
            run_script(&pool, script).await?;
        }

        info!(
            "embedded=ready engine=sqlite scripts={}",
            self.scripts.len()
        );
        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }
}

/// Hands the whole script to SQLite, which owns statement boundaries
/// (trigger bodies, quoted `;`, comments).
async fn run_script(pool: &SqlitePool, script: &SqlScript) -> Result<(), DbInfraError> {
    debug!(script = %script.name, "embedded=script_start");
    if let Err(e) = sqlx::raw_sql(&script.sql).execute(pool).await {
        error!(script = %script.name, error = %e, "embedded=script_failed");
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    use super::*;

    #[tokio::test]
    async fn runs_scripts_in_declared_order() {
        let conn = EmbeddedDatabaseBuilder::new()
            .set_type(EmbeddedDatabaseType::Sqlite)
            .add_script(SqlScript::inline(
                "schema",
                "CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT NOT NULL);",
            ))
            .add_script(SqlScript::inline(
                "data",
                "INSERT INTO t (v) VALUES ('a'); INSERT INTO t (v) VALUES ('b');",
            ))
            .build()
            .await
            .unwrap();

        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS cnt FROM t",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i64>("", "cnt").unwrap(), 2);
    }

    #[tokio::test]
    async fn seed_before_schema_fails() {
        let result = EmbeddedDatabaseBuilder::new()
            .add_script(SqlScript::inline("data", "INSERT INTO t (v) VALUES ('a');"))
            .add_script(SqlScript::inline("schema", "CREATE TABLE t (v TEXT);"))
            .build()
            .await;
        assert!(matches!(result, Err(DbInfraError::Sqlx(_))));
    }

    #[tokio::test]
    async fn trigger_bodies_run_as_one_statement() {
        let conn = EmbeddedDatabaseBuilder::new()
            .add_script(SqlScript::inline(
                "schema",
                "CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT, touched INTEGER DEFAULT 0);\n\
                 CREATE TRIGGER t_touch AFTER UPDATE OF v ON t\n\
                 BEGIN\n\
                     UPDATE t SET touched = 1 WHERE id = NEW.id;\n\
                 END;\n",
            ))
            .add_script(SqlScript::inline(
                "data",
                "-- seed; one row\nINSERT INTO t (id, v) VALUES (1, 'a;b');",
            ))
            .build()
            .await
            .unwrap();

        conn.execute_unprepared("UPDATE t SET v = 'c' WHERE id = 1")
            .await
            .unwrap();

        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT touched FROM t WHERE id = 1",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i32>("", "touched").unwrap(), 1);
    }

    #[tokio::test]
    async fn each_build_is_isolated() {
        let schema = SqlScript::inline("schema", "CREATE TABLE t (v TEXT);");
        let first = EmbeddedDatabaseBuilder::new()
            .add_script(schema.clone())
            .build()
            .await
            .unwrap();
        first
            .execute_unprepared("INSERT INTO t (v) VALUES ('only-in-first')")
            .await
            .unwrap();

        let second = EmbeddedDatabaseBuilder::new()
            .add_script(schema)
            .build()
            .await
            .unwrap();
        let row = second
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS cnt FROM t",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i64>("", "cnt").unwrap(), 0);
    }

    #[test]
    fn missing_script_file_is_a_configuration_error() {
        let err = SqlScript::from_file("/definitely/not/here.sql").unwrap_err();
        assert!(err.is_config());
    }
}
