use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{
    config::AppConfig,
    instances::repo::{InstanceStore, PgInstanceStore},
    users::repo::{PgUserStore, UserStore},
    vms::repo::{PgVmStore, VmStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub instances: Arc<dyn InstanceStore>,
    pub vms: Arc<dyn VmStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("database migrations applied");

        Ok(Self::from_pool(db, config))
    }

    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgInstanceStore::new(db.clone())),
            Arc::new(PgVmStore::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        instances: Arc<dyn InstanceStore>,
        vms: Arc<dyn VmStore>,
    ) -> Self {
        Self {
            config,
            users,
            instances,
            vms,
        }
    }
}
