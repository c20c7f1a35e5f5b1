//! Readiness endpoint

use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;
use serde_json::Value;

use crate::state::AppState;

/// Create a router with the /ready endpoint
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(state)
}

/// Readiness probe: verifies the database with one `SELECT 1` round trip
async fn ready_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async { check_health(&state.db).await.map_err(|e| e.to_string()) }),
    )];

    run_health_checks(checks).await
}
