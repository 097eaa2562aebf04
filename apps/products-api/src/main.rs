//! Products API - REST server over MongoDB or an in-memory store

use axum_helpers::server::{create_production_app, create_router};
use core_config::{FromEnv, tracing::{init_tracing, install_color_eyre}};
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

    info!(store = %config.store, "Starting {} v{}", config.app.name, config.app.version);

    let state = AppState::connect(config).await?;

    api::init_indexes(&state).await?;

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?;

    info!("Starting Products API on port {}", state.config.server.port);

    let mongo_client = state.mongo_client();
    create_production_app(
        router,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(client) = mongo_client {
                info!("Shutting down: closing MongoDB connections");
                client.shutdown().await;
                info!("MongoDB connection closed");
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
