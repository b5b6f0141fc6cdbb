use axum_helpers::server::{create_production_app, create_router_with_openapi, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
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
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        project = %config.project_name,
        "Connecting to MongoDB at {}",
        config.mongodb.redacted_url()
    );

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    let products = api::products::store(&state).await?;
    let api_routes = api::routes(&state, api::products::router(products));

    let router = create_router_with_openapi(
        api_routes,
        &state.config.server.root_path,
        openapi::document(&state.config.project_name),
    )?;

    let app = router.merge(health_router(state.config.app));

    info!(
        "Starting {} with production-ready shutdown (30s timeout)",
        state.config.project_name
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Store API shutdown complete");
    Ok(())
}
