//! Business logic services

pub mod backup;
pub mod maintenance;
pub mod spare_parts;

use std::path::PathBuf;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub spare_parts: spare_parts::SparePartsService,
    pub maintenance: maintenance::MaintenanceService,
    pub backup: backup::BackupService,
}

impl Services {
    /// Create all services with the given repository and storage paths
    pub fn new(
        repository: Repository,
        database_path: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spare_parts: spare_parts::SparePartsService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone()),
            backup: backup::BackupService::new(repository, database_path, backup_dir),
        }
    }
}
