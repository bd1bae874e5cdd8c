//! Sparetrack Server - Spare Parts Inspection Tracking
//!
//! Startup order matters: the schema migration check gates everything else,
//! and the backup scheduler only starts once the store is known compatible.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sparetrack_server::{
    config::AppConfig,
    migrator::Migrator,
    repository::Repository,
    scheduler::SchedulerHandle,
    services::Services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("sparetrack_server={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sparetrack Server v{}", env!("CARGO_PKG_VERSION"));

    // Create the database directory and connection pool
    if let Some(parent) = Path::new(&config.database.path).parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.database.path))
        .context("Invalid database path")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    tracing::info!(path = %config.database.path, "opened database");

    // Run the migration check; a failure aborts startup
    let mut migrator = Migrator::new(pool.clone());
    migrator
        .run()
        .await
        .context("Database migration failed, refusing to start")?;

    // Create repository and services
    let repository = Repository::new(pool.clone());
    let services = Services::new(repository, &config.database.path, &config.backup.dir);

    // Start the backup scheduler from the persisted configuration
    let scheduler = SchedulerHandle::new();
    let backup_config = services.backup.get_config().await?;
    scheduler.reschedule(services.backup.clone(), &backup_config)?;

    tracing::info!("Sparetrack Server started");

    // Run until interrupted
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");
    scheduler.stop();
    pool.close().await;

    Ok(())
}
