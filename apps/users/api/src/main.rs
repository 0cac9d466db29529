use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
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
    // Before any fallible operation so startup errors get colored reports
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let retry = RetryConfig::new().with_max_retries(5);
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), Some(retry))
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.database.migrate {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    }

    let state = AppState::new(config, db);

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), &state.config.server)?;

    // /health: liveness with app name/version
    // /ready: database ping
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting users API with graceful shutdown (30s timeout)");

    let server = state.config.server.clone();
    create_production_app(
        app,
        &server,
        Duration::from_secs(30),
        close_postgres(state.db),
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
