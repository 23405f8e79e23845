use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::domain::ScopeRegistry;
use crate::services::{AuthService, PlanningService, SeaOrmAuthService, SeaOrmPlanningService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub planning_service: Arc<dyn PlanningService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_scopes(config, ScopeRegistry::default()).await
    }

    /// Builds the state with a custom role → scope mapping, handed to the
    /// planning service.
    pub async fn with_scopes(config: Config, scopes: ScopeRegistry) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let planning_service = Arc::new(SeaOrmPlanningService::new(
            store.clone(),
            Arc::new(scopes),
        )) as Arc<dyn PlanningService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            planning_service,
            auth_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
