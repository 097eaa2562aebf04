//! Readiness endpoint; liveness comes from `axum_helpers::health_router`

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, health_router, run_health_checks};
use database::mongodb::check_health_detailed;

use crate::state::AppState;

/// Check that the products store is reachable
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable"),
        (status = 503, description = "A dependency is unreachable")
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks: Vec<(&str, HealthCheckFuture)> = Vec::new();

    if let Some(client) = state.mongo_client() {
        checks.push((
            "mongodb",
            Box::pin(async move {
                let status = check_health_detailed(&client).await;
                if status.healthy {
                    Ok(())
                } else {
                    Err(status.message.unwrap_or_default())
                }
            }),
        ));
    }

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    let app = state.config.app.clone();
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
        .merge(health_router(app))
}
