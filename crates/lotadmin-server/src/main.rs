//! QC console admin server — application entry point.
//!
//! Connects to SurrealDB, applies migrations, and keeps the session
//! table tidy until shut down. The HTTP surface is mounted by the
//! console frontend; this binary owns the shared infrastructure.

use std::time::Duration;

use lotadmin_core::repository::SessionRepository;
use lotadmin_db::repository::SurrealSessionRepository;
use lotadmin_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("lotadmin=info".parse()?),
        )
        .json()
        .init();

    tracing::info!("starting lotadmin server");

    let config = DbConfig::from_env();
    let manager = DbManager::connect(&config).await?;
    lotadmin_db::run_migrations(manager.client()).await?;

    let sessions = SurrealSessionRepository::new(manager.client().clone());

    let cleanup = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            match sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "removed expired sessions"),
                Err(err) => tracing::warn!(error = %err, "session cleanup failed"),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    cleanup.abort();

    tracing::info!("lotadmin server stopped");
    Ok(())
}
