//! Configuration management for Sparetrack server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupStorageConfig {
    /// Directory where backup artifacts are written
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub backup: BackupStorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix SPARETRACK_)
            .add_source(
                Environment::with_prefix("SPARETRACK")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override database path from DATABASE_PATH env var if present
            .set_override_option("database.path", env::var("DATABASE_PATH").ok())?
            // Override backup directory from BACKUP_DIR env var if present
            .set_override_option("backup.dir", env::var("BACKUP_DIR").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/spare_parts.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for BackupStorageConfig {
    fn default() -> Self {
        Self {
            dir: "data/db_backups".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
