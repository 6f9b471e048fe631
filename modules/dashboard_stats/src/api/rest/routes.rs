use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_dashboard_stats),
    components(schemas(dto::DashboardStatsDto, modkit::Problem)),
    modifiers(&BearerAuth),
    tags((name = "stats", description = "Dashboard statistics"))
)]
pub struct StatsApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let stats = Router::new()
        .route("/stats/dashboard", get(handlers::get_dashboard_stats))
        .route("/stats/{*rest}", get(handlers::stats_not_found))
        .layer(Extension(service));
    router.merge(stats)
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    StatsApiDoc::openapi()
}
