use std::fmt;

use db_infra::{DialectAdapter, ResourceBinding};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityName, EntityTrait, Statement};
use tracing::{debug, info};

use crate::error::AppError;

/// One mapped entity: where it lives and which table backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub namespace: &'static str,
    pub name: &'static str,
    pub table: String,
}

impl EntityDescriptor {
    pub fn of<E: EntityTrait>(namespace: &'static str) -> Self {
        let type_name = std::any::type_name::<E>();
        // `example_web::entities::example::Entity` -> `example`
        let name = type_name
            .rsplit("::")
            .nth(1)
            .unwrap_or(type_name);
        Self {
            namespace,
            name,
            table: E::default().table_name().to_string(),
        }
    }

    fn belongs_to(&self, namespace: &str) -> bool {
        self.namespace == namespace || self.namespace.starts_with(&format!("{namespace}::"))
    }
}

impl fmt::Display for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{} ({})", self.namespace, self.name, self.table)
    }
}

/// Pairs the bound connection with its dialect and the entities mapped under
/// one namespace. Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    conn: DatabaseConnection,
    dialect: DialectAdapter,
    namespace: String,
    entities: Vec<EntityDescriptor>,
}

impl SessionFactory {
    pub fn build(
        conn: DatabaseConnection,
        dialect: DialectAdapter,
        namespace: &str,
        candidates: Vec<EntityDescriptor>,
    ) -> Result<Self, AppError> {
        let backend = conn.get_database_backend();
        if backend != dialect.backend() {
            return Err(AppError::config(format!(
                "connection speaks {backend:?} but the session factory was given the {dialect} dialect"
            )));
        }

        let entities: Vec<EntityDescriptor> = candidates
            .into_iter()
            .filter(|e| e.belongs_to(namespace))
            .collect();
        if entities.is_empty() {
            return Err(AppError::config(format!(
                "no entities registered under namespace '{namespace}'"
            )));
        }

        info!(
            "session_factory=ready dialect={} namespace={} entities={}",
            dialect,
            namespace,
            entities.len()
        );
        for entity in &entities {
            debug!("session_factory=entity {entity}");
        }

        Ok(Self {
            conn,
            dialect,
            namespace: namespace.to_string(),
            entities,
        })
    }

    pub fn from_binding(
        binding: &ResourceBinding,
        namespace: &str,
        candidates: Vec<EntityDescriptor>,
    ) -> Result<Self, AppError> {
        Self::build(
            binding.connection().clone(),
            binding.dialect(),
            namespace,
            candidates,
        )
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn dialect(&self) -> DialectAdapter {
        self.dialect
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    pub fn is_registered<E: EntityTrait>(&self) -> bool {
        let table = E::default().table_name().to_string();
        self.entities.iter().any(|e| e.table == table)
    }

    /// Tables of registered entities that the database does not have.
    pub async fn missing_tables(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for entity in &self.entities {
            let check = Statement::from_string(
                self.conn.get_database_backend(),
                format!("SELECT 1 FROM {} WHERE 1 = 0", entity.table),
            );
            if self.conn.query_one(check).await.is_err() {
                missing.push(entity.table.clone());
            }
        }
        missing
    }
}
