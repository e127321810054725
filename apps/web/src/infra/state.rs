use std::sync::Arc;

use db_infra::{
    activate, bind, BindOptions, ConnectionParameters, DeploymentProfile, PoolSettings,
    ResourceBinding, SqlScript,
};
use tracing::{info, warn};

use crate::config::web::WebConfig;
use crate::db::TransactionManager;
use crate::entities::{self, NAMESPACE};
use crate::error::AppError;
use crate::orm::{RepositoryFactory, SessionFactory};
use crate::repos::examples::ExampleRepository;
use crate::state::app_state::AppState;
use crate::views::{RequestToViewNameTranslator, ViewResolverChain};

const DEV_SCHEMA: &str = include_str!("../../resources/db/dev-schema.sql");
const DEV_TEST_DATA: &str = include_str!("../../resources/db/dev-test-data.sql");

/// Schema first, then seed data. Order matters.
pub fn dev_scripts() -> Vec<SqlScript> {
    vec![
        SqlScript::inline("dev-schema.sql", DEV_SCHEMA),
        SqlScript::inline("dev-test-data.sql", DEV_TEST_DATA),
    ]
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    profile: Option<DeploymentProfile>,
    params: ConnectionParameters,
    pool: PoolSettings,
    web: WebConfig,
    process_wide: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            profile: None,
            params: ConnectionParameters::new(),
            pool: PoolSettings::default(),
            web: WebConfig::default(),
            process_wide: false,
        }
    }

    pub fn with_profile(mut self, profile: DeploymentProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_params(mut self, params: ConnectionParameters) -> Self {
        self.params = params;
        self
    }

    pub fn with_pool(mut self, pool: PoolSettings) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Bind through the process-wide slot instead of a private binding.
    pub fn process_wide(mut self) -> Self {
        self.process_wide = true;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let profile = self
            .profile
            .ok_or_else(|| AppError::config("no deployment profile selected"))?;

        let options = BindOptions {
            pool: self.pool,
            dev_scripts: dev_scripts(),
        };
        let binding: ResourceBinding = if self.process_wide {
            activate(profile, &self.params, &options).await?.clone()
        } else {
            bind(profile, &self.params, &options).await?
        };

        let session = SessionFactory::from_binding(&binding, NAMESPACE, entities::registered())?;
        ensure_schema(profile, &session).await?;

        let repos = RepositoryFactory::new(&session);
        let examples = ExampleRepository::new(&repos)?;
        let views = ViewResolverChain::standard(&self.web.web_root);
        info!(
            "state=ready profile={} resolvers={:?} web_root={}",
            profile,
            views.names(),
            self.web.web_root.display()
        );

        Ok(AppState {
            profile,
            descriptor: binding.descriptor().clone(),
            txn: TransactionManager::new(&session),
            session,
            examples,
            views: Arc::new(views),
            translator: RequestToViewNameTranslator::new(),
            resources_dir: self.web.resources_dir(),
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

/// The embedded database must come up complete from its scripts. A server
/// database may still be waiting on the migration CLI, so only warn there.
async fn ensure_schema(profile: DeploymentProfile, session: &SessionFactory) -> Result<(), AppError> {
    let missing = session.missing_tables().await;
    if missing.is_empty() {
        return Ok(());
    }
    if profile.is_server() {
        warn!(
            "schema=incomplete profile={} missing={:?} hint=run migration-cli",
            profile, missing
        );
        return Ok(());
    }
    Err(AppError::config(format!(
        "embedded database is missing tables {missing:?} after init scripts"
    )))
}
