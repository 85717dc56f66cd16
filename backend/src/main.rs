//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::time::Duration;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pawcare::inbound::http::health::HealthState;
use pawcare::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pawcare::settings::ServerSettings;
use server::{ServerConfig, create_server};

const DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session_ttl = settings.session_ttl().map_err(std::io::Error::other)?;
    let admin = settings.admin_credentials().map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr, session_ttl).with_admin(admin);
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            run_pending_migrations(database_url)
                .await
                .map_err(std::io::Error::other)?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url)
                .with_max_size(settings.db_max_connections())
                .with_connection_timeout(DB_CONNECT_TIMEOUT),
        )
        .await
        .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    info!(%bind_addr, "pawcare listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
