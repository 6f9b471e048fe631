use std::sync::Arc;

use axum::{extract::Extension, http::Uri, Json};
use modkit::{Principal, Problem, ProblemResponse, XRequestId};
use tracing::{error, info};

use crate::api::rest::dto::DashboardStatsDto;
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::domain::service::Service;

/// Dashboard counters for the authenticated caller.
#[utoipa::path(
    get,
    path = "/stats/dashboard",
    operation_id = "dashboard_stats.get_dashboard",
    tag = "stats",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStatsDto),
        (status = 401, description = "Missing or invalid credentials", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_dashboard_stats(
    principal: Principal,
    Extension(svc): Extension<Arc<Service>>,
    rid: Option<Extension<XRequestId>>,
    uri: Uri,
) -> Result<Json<DashboardStatsDto>, ProblemResponse> {
    info!(user_id = %principal.user_id, "Computing dashboard stats");

    match svc.dashboard(principal.user_id).await {
        Ok(stats) => Ok(Json(stats.into())),
        Err(e) => {
            error!(user_id = %principal.user_id, error = %e, "Failed to compute dashboard stats");
            Err(map_domain_error(
                &e,
                uri.path(),
                rid.as_ref().map(|Extension(XRequestId(id))| id.as_str()),
            ))
        }
    }
}

/// Anything else under `/stats`.
pub async fn stats_not_found(
    rid: Option<Extension<XRequestId>>,
    uri: Uri,
) -> ProblemResponse {
    from_parts(
        axum::http::StatusCode::NOT_FOUND,
        "NOT_FOUND",
        "Not Found",
        format!("No statistics resource at {}", uri.path()),
        uri.path(),
        rid.as_ref().map(|Extension(XRequestId(id))| id.as_str()),
    )
}
