//! Subscriptions API - REST service for tracking user subscriptions

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres;
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");

    let db = postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    // Replay pending migrations so the schema is in its latest shape
    // before the first request arrives
    postgres::run_migrations::<Migrator>(&db, "subscriptions-api")
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    // Build REST router
    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::ready_router(state.clone()));

    info!(
        "Starting Subscriptions API on port {}",
        state.config.server.port
    );

    let db_handle = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing PostgreSQL connections");
            if let Err(e) = db_handle.close().await {
                tracing::warn!("Failed to close database connection: {}", e);
            } else {
                info!("PostgreSQL connection closed");
            }
        },
    )
    .await?;

    info!("Subscriptions API shutdown complete");
    Ok(())
}
