//! Example repository: domain model plus the CRUD operations the routes use.

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{example, ExampleRow, Examples};
use crate::error::AppError;
use crate::orm::{CrudRepository, RepositoryFactory};

pub const NAME_MAX_LEN: usize = 255;

/// Example domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<ExampleRow> for Example {
    fn from(row: ExampleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Request body for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct ExampleInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExampleInput {
    /// Trims both fields; a blank description becomes `None`.
    fn normalized(self) -> Result<(String, Option<String>), AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::invalid("EXAMPLE_NAME_REQUIRED", "name must not be blank"));
        }
        if name.chars().count() > NAME_MAX_LEN {
            return Err(AppError::invalid(
                "EXAMPLE_NAME_TOO_LONG",
                format!("name must be at most {NAME_MAX_LEN} characters"),
            ));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok((name, description))
    }
}

#[derive(Debug, Clone)]
pub struct ExampleRepository {
    crud: CrudRepository<Examples>,
}

impl ExampleRepository {
    pub fn new(factory: &RepositoryFactory) -> Result<Self, AppError> {
        Ok(Self {
            crud: factory.repository::<Examples>()?,
        })
    }

    pub async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Example>, AppError> {
        Ok(self.crud.find_by_id(conn, id).await?.map(Example::from))
    }

    pub async fn require<C: ConnectionTrait>(&self, conn: &C, id: i64) -> Result<Example, AppError> {
        self.find(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("EXAMPLE_NOT_FOUND", format!("Example {id} not found")))
    }

    pub async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Example>, AppError> {
        let rows = self.crud.find_all(conn).await?;
        Ok(rows.into_iter().map(Example::from).collect())
    }

    pub async fn count<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, AppError> {
        Ok(self.crud.count(conn).await?)
    }

    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: ExampleInput,
    ) -> Result<Example, AppError> {
        let (name, description) = input.normalized()?;
        let row = example::ActiveModel {
            id: NotSet,
            name: Set(name),
            description: Set(description),
        };
        Ok(self.crud.insert(conn, row).await?.into())
    }

    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
        input: ExampleInput,
    ) -> Result<Example, AppError> {
        let (name, description) = input.normalized()?;
        let row = example::ActiveModel {
            id: Set(id),
            name: Set(name),
            description: Set(description),
        };
        match self.crud.update(conn, row).await {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Err(
                AppError::not_found("EXAMPLE_NOT_FOUND", format!("Example {id} not found")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i64) -> Result<(), AppError> {
        if self.crud.delete_by_id(conn, id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "EXAMPLE_NOT_FOUND",
                format!("Example {id} not found"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, description: Option<&str>) -> ExampleInput {
        ExampleInput {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = input("   ", None).normalized().unwrap_err();
        assert!(matches!(err, AppError::Validation { code: "EXAMPLE_NAME_REQUIRED", .. }));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let err = input(&"x".repeat(NAME_MAX_LEN + 1), None)
            .normalized()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { code: "EXAMPLE_NAME_TOO_LONG", .. }));
    }

    #[test]
    fn fields_are_trimmed_and_blank_description_dropped() {
        let (name, description) = input("  alpha ", Some("  ")).normalized().unwrap();
        assert_eq!(name, "alpha");
        assert_eq!(description, None);
    }
}
