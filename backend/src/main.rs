//! Service entry-point: loads settings, migrates the schema, wires the
//! user and health services and serves HTTP until a shutdown signal.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use users_api::domain::{HealthService, UserService};
use users_api::inbound::http::health::HealthState;
use users_api::inbound::http::state::HttpState;
use users_api::middleware::trace::with_new_trace;
use users_api::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use users_api::server::{ServerConfig, create_server, shutdown_signal};
use users_api::settings::AppSettings;

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    load_dotenv();

    let settings = AppSettings::load(env!("CARGO_PKG_NAME"))?;
    let db = &settings.database;
    let database_url = db.database_url();

    let applied = with_new_trace(run_pending_migrations(database_url.clone()))
        .await
        .wrap_err("failed to migrate database schema")?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(db.max_connections())
            .with_min_idle(Some(db.min_idle()))
            .with_connection_timeout(db.connect_timeout())
            .with_max_lifetime(Some(db.max_lifetime())),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let repo = Arc::new(
        DieselUserRepository::new(pool, Arc::new(DefaultClock))
            .with_statement_timeout(db.statement_timeout()),
    );
    let users = Arc::new(UserService::new(repo.clone()));
    let http_state = HttpState::new(users.clone(), users, Arc::new(HealthService::new(repo)));

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::from(&settings.server);
    let (host, port) = (config.host().to_owned(), config.port());
    info!(%host, port, env = %settings.environment.env, "server starting");
    let server = create_server(health_state.clone(), http_state, config)
        .wrap_err_with(|| format!("failed to bind {host}:{port}"))?;
    info!(%host, port, "server listening");

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received; draining connections");
        health_state.mark_unhealthy();
        handle.stop(true).await;
    });

    server.await?;
    info!("server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Load a `.env` file from the working directory when one exists.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env file"),
        Err(error) if error.not_found() => {}
        Err(error) => warn!(%error, "failed to read .env file"),
    }
}
