//! Health check endpoint handlers.

use axum::{extract::State, response::Json};
use jiff::Timestamp;
use tracing::warn;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// Liveness check with the catalog size.
///
/// Reports `degraded` when the catalog cannot be counted.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, items) = match state.services.items.count_items().await {
        Ok(count) => (HealthStatus::Healthy, count),
        Err(e) => {
            warn!(error = %e, "Health check could not count items");
            (HealthStatus::Degraded, 0)
        }
    };

    Json(HealthResponse {
        status,
        name: state.app_name.clone(),
        version: crate::pkg_version().to_string(),
        timestamp: Timestamp::now().to_string(),
        items,
    })
}
