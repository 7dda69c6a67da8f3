//! Backend entry-point: loads settings, prepares the store, and serves the API.

mod server;

use std::ffi::OsString;
use std::net::SocketAddr;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server, mark_unhealthy_on};
use taskboard::inbound::http::health::HealthState;
use taskboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use taskboard::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let bind_addr = parse_bind_address(settings.bind_address())?;

    let mut config = ServerConfig::new(bind_addr);
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            apply_migrations(database_url.to_owned()).await?;
        }
        let pool = DbPool::new(PoolConfig::from_settings(database_url, &settings))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(mark_unhealthy_on(tokio::signal::ctrl_c(), health_state));
    server.await
}

fn parse_bind_address(raw: &str) -> std::io::Result<SocketAddr> {
    raw.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {raw:?}: {e}"),
        )
    })
}

async fn apply_migrations(database_url: String) -> std::io::Result<()> {
    let applied = web::block(move || run_pending_migrations(&database_url))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!(applied, "database migrations complete");
    Ok(())
}
