//! Backend entry-point: loads settings, applies migrations and serves the
//! REST API with OpenAPI docs in debug builds.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?;

    run_pending_migrations(database_url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
    )
    .await
    .wrap_err("database pool unavailable")?;

    let config = ServerConfig::new(settings.bind_addr(), pool);
    info!(addr = %config.bind_addr(), "starting recipe backend");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
