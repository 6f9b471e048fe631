use async_trait::async_trait;
use axum::Router;

/// Core module: DI/wiring; do not rely on migrated schema here.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    /// Stable name, also the key of the module's config section.
    fn name(&self) -> &'static str;

    async fn init(&self, ctx: &crate::context::ModuleCtx) -> anyhow::Result<()>;
}

#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs AFTER init, BEFORE REST.
    async fn migrate(&self, db: &db::DbHandle) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
pub trait RestfulModule: Send + Sync {
    fn register_rest(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
    ) -> anyhow::Result<Router>;

    /// OpenAPI fragment describing the routes added by `register_rest`.
    fn openapi(&self) -> utoipa::openapi::OpenApi;
}
