use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::DashboardStatsConfig;
use crate::contract::client::DashboardStatsApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::DashboardStatsLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmSessionFactory;

pub const MODULE_NAME: &str = "dashboard_stats";

/// Dashboard statistics: storage, aggregation and `GET /stats/dashboard`.
#[derive(Default)]
pub struct DashboardStatsModule {
    service: ArcSwapOption<Service>,
}

impl DashboardStatsModule {
    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules; available after `init`.
    pub fn client(&self) -> anyhow::Result<Arc<dyn DashboardStatsApi>> {
        Ok(Arc::new(DashboardStatsLocalClient::new(self.service()?)))
    }
}

#[async_trait]
impl Module for DashboardStatsModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing dashboard_stats module");

        let cfg: DashboardStatsConfig = ctx.clone().for_module(MODULE_NAME).module_config()?;
        debug!(
            trace_interactions = cfg.trace_interactions,
            "Loaded dashboard_stats config"
        );

        let db = ctx.db_required()?;
        let sessions = SeaOrmSessionFactory::new(db.sea());
        let service = Service::new(
            Arc::new(sessions),
            ServiceConfig {
                trace_interactions: cfg.trace_interactions,
            },
        );

        self.service.store(Some(Arc::new(service)));
        Ok(())
    }
}

#[async_trait]
impl DbModule for DashboardStatsModule {
    async fn migrate(&self, db: &db::DbHandle) -> anyhow::Result<()> {
        info!("Running dashboard_stats database migrations");
        Migrator::up(db.seaorm(), None).await?;
        info!("dashboard_stats migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for DashboardStatsModule {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering dashboard_stats REST routes");
        Ok(routes::register_routes(router, self.service()?))
    }

    fn openapi(&self) -> utoipa::openapi::OpenApi {
        routes::openapi()
    }
}
