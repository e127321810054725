use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityName, EntityTrait,
    IntoActiveModel, Iterable, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder,
};

use crate::error::AppError;
use crate::orm::session::SessionFactory;

/// Hands out repositories for entities the session factory knows about.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    session: SessionFactory,
}

impl RepositoryFactory {
    pub fn new(session: &SessionFactory) -> Self {
        Self {
            session: session.clone(),
        }
    }

    pub fn repository<E>(&self) -> Result<CrudRepository<E>, AppError>
    where
        E: EntityTrait,
    {
        let table = E::default().table_name().to_string();
        if !self.session.is_registered::<E>() {
            return Err(AppError::config(format!(
                "entity for table '{table}' is not registered under '{}'",
                self.session.namespace()
            )));
        }
        Ok(CrudRepository {
            table,
            _entity: PhantomData,
        })
    }
}

/// Generic create/read/update/delete over one entity with an `i64` key.
///
/// Every operation takes the connection to run on, so the same repository
/// works against the pool or inside a transaction.
#[derive(Debug)]
pub struct CrudRepository<E> {
    table: String,
    _entity: PhantomData<E>,
}

impl<E> Clone for CrudRepository<E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> CrudRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn find_by_id<C>(&self, conn: &C, id: i64) -> Result<Option<E::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        E::find_by_id(id).one(conn).await
    }

    /// All rows, ordered by primary key.
    pub async fn find_all<C>(&self, conn: &C) -> Result<Vec<E::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = E::find();
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }
        query.all(conn).await
    }

    pub async fn count<C>(&self, conn: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        E::find().count(conn).await
    }

    pub async fn exists_by_id<C>(&self, conn: &C, id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(self.find_by_id(conn, id).await?.is_some())
    }

    pub async fn insert<C, A>(&self, conn: &C, model: A) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(conn).await
    }

    /// Fails with `DbErr::RecordNotUpdated` when no row has the model's key.
    pub async fn update<C, A>(&self, conn: &C, model: A) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        model.update(conn).await
    }

    /// Returns whether a row was removed.
    pub async fn delete_by_id<C>(&self, conn: &C, id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = E::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }
}
