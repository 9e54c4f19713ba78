//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::inbound::http::health::HealthState;
use foodgram::inbound::http::session_config::{BuildMode, key_fingerprint, session_settings};
use foodgram::outbound::persistence::{DbPool, run_migrations};
use foodgram::settings::AppSettings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

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

    let settings = AppSettings::load().map_err(|e| startup_error("invalid settings", e))?;
    let session = session_settings(&settings.session_toggles(), BuildMode::from_debug_assertions())
        .map_err(|e| startup_error("invalid session configuration", e))?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_error("invalid settings", e))?;
    let pool_config = settings
        .pool_config()
        .map_err(|e| startup_error("invalid settings", e))?;
    let page_size = settings
        .page_size()
        .map_err(|e| startup_error("invalid settings", e))?;

    run_migrations(pool_config.database_url())
        .await
        .map_err(|e| startup_error("database migration failed", e))?;
    let db_pool = DbPool::new(pool_config)
        .await
        .map_err(|e| startup_error("database pool unavailable", e))?;

    let config = ServerConfig::new(session, bind_addr, db_pool, settings.media_config())
        .with_page_size(page_size)
        .with_shopping_list_layout(settings.shopping_list_layout());

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await
}
