//! Repository layer for database operations

pub mod backup_config;
pub mod maintenance_records;
pub mod spare_parts;

use sqlx::SqlitePool;

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: SqlitePool,
    pub spare_parts: spare_parts::SparePartsRepository,
    pub maintenance_records: maintenance_records::MaintenanceRecordsRepository,
    pub backup_config: backup_config::BackupConfigRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            spare_parts: spare_parts::SparePartsRepository::new(pool.clone()),
            maintenance_records: maintenance_records::MaintenanceRecordsRepository::new(
                pool.clone(),
            ),
            backup_config: backup_config::BackupConfigRepository::new(pool.clone()),
            pool,
        }
    }
}
