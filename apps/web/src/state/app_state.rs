use std::path::PathBuf;
use std::sync::Arc;

use db_infra::{DataSourceDescriptor, DeploymentProfile, DialectAdapter};
use sea_orm::DatabaseConnection;

use crate::db::TransactionManager;
use crate::orm::SessionFactory;
use crate::repos::examples::ExampleRepository;
use crate::views::{RequestToViewNameTranslator, ViewResolverChain};

/// Everything a request handler needs, shared read-only across workers.
#[derive(Clone)]
pub struct AppState {
    pub profile: DeploymentProfile,
    pub descriptor: DataSourceDescriptor,
    pub session: SessionFactory,
    pub txn: TransactionManager,
    pub examples: ExampleRepository,
    pub views: Arc<ViewResolverChain>,
    pub translator: RequestToViewNameTranslator,
    /// Directory served under `/resources`.
    pub resources_dir: PathBuf,
}

impl AppState {
    pub fn db(&self) -> &DatabaseConnection {
        self.session.connection()
    }

    pub fn dialect(&self) -> DialectAdapter {
        self.session.dialect()
    }
}
