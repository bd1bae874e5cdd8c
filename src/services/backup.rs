//! Backup service
//!
//! Runs the two snapshot jobs (raw database copy and structured CSV export)
//! and the retention sweep, and owns the artifact surface exposed to the API
//! layer. A job failure is reported in its own result and never aborts the
//! sibling job or the sweep.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::{
    error::{AppError, AppResult},
    lifecycle,
    models::{
        backup::{BackupArtifact, BackupConfig, BackupJobReport, UpdateBackupConfig},
        enums::BackupKind,
        spare_part::SparePartFilter,
    },
    repository::Repository,
    scheduler::{self, SchedulerHandle},
};

/// Recognized artifact name prefixes. Anything else in the backup directory
/// is never listed, downloaded, or deleted.
pub const DATABASE_PREFIX: &str = "database_backup_";
pub const EXPORT_PREFIX: &str = "excel_backup_";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Clone)]
pub struct BackupService {
    repository: Repository,
    database_path: PathBuf,
    backup_dir: PathBuf,
}

impl BackupService {
    pub fn new(
        repository: Repository,
        database_path: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            database_path: database_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Current backup configuration, created with defaults on first read
    pub async fn get_config(&self) -> AppResult<BackupConfig> {
        self.repository.backup_config.get_or_create().await
    }

    /// Merge a partial update into the configuration, rewrite the row, and
    /// reschedule the recurring job through the passed handle.
    pub async fn update_config(
        &self,
        scheduler: &SchedulerHandle,
        update: UpdateBackupConfig,
    ) -> AppResult<BackupConfig> {
        let mut config = self.get_config().await?;

        if let Some(enabled) = update.auto_backup_enabled {
            config.auto_backup_enabled = enabled;
        }
        if let Some(time) = update.backup_time {
            scheduler::parse_backup_time(&time)?;
            config.backup_time = time;
        }
        if let Some(keep_days) = update.keep_days {
            if keep_days < 0 {
                return Err(AppError::Validation(
                    "keep_days must not be negative".to_string(),
                ));
            }
            config.keep_days = keep_days;
        }
        if let Some(kind) = update.backup_kind {
            config.backup_kind = kind;
        }

        self.repository.backup_config.save(&config).await?;
        scheduler.reschedule(self.clone(), &config)?;
        Ok(config)
    }

    /// Run the snapshot jobs for `kind` synchronously, one report per job
    pub async fn run_backup_now(&self, kind: BackupKind) -> Vec<BackupJobReport> {
        let mut reports = Vec::new();

        if kind.includes_database() {
            reports.push(match self.run_database_backup().await {
                Ok(artifact) => BackupJobReport::ok("database", artifact),
                Err(e) => {
                    tracing::error!(error = %e, "database backup job failed");
                    BackupJobReport::failed("database", e)
                }
            });
        }

        if kind.includes_export() {
            reports.push(match self.run_export_backup().await {
                Ok(artifact) => BackupJobReport::ok("excel", artifact),
                Err(e) => {
                    tracing::error!(error = %e, "export backup job failed");
                    BackupJobReport::failed("excel", e)
                }
            });
        }

        reports
    }

    /// One scheduled cycle: re-read the configuration, run the snapshot
    /// jobs, then sweep. Nothing here propagates an error to the timer.
    pub async fn run_scheduled_cycle(&self) {
        let config = match self.get_config().await {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "could not read backup configuration, skipping cycle");
                return;
            }
        };

        for report in self.run_backup_now(config.backup_kind).await {
            if report.success {
                tracing::info!(job = %report.job, "scheduled backup job completed");
            }
        }

        match self.retention_sweep(config.keep_days).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(deleted, "retention sweep removed expired artifacts");
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "retention sweep failed"),
        }
    }

    /// Delete artifacts older than `keep_days`. A failure on one file is
    /// logged and the sweep continues; returns the number deleted.
    pub async fn retention_sweep(&self, keep_days: i64) -> AppResult<usize> {
        let cutoff = Local::now() - Duration::days(keep_days);
        let mut deleted = 0;

        for artifact in self.list_artifacts().await? {
            if artifact.created_at >= cutoff {
                continue;
            }
            match tokio::fs::remove_file(self.backup_dir.join(&artifact.name)).await {
                Ok(()) => {
                    tracing::info!(name = %artifact.name, "swept expired backup artifact");
                    deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(name = %artifact.name, error = %e, "failed to sweep artifact");
                }
            }
        }

        Ok(deleted)
    }

    /// Enumerate recognized artifacts in the backup directory, newest first
    pub async fn list_artifacts(&self) -> AppResult<Vec<BackupArtifact>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.backup_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if recognized_kind(&name).is_none() {
                continue;
            }
            match self.artifact_from_path(&entry.path()) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => tracing::warn!(name = %name, error = %e, "skipping unreadable artifact"),
            }
        }

        artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(artifacts)
    }

    /// Resolve an artifact name to its path for download. The name is
    /// validated before any filesystem access.
    pub fn artifact_path(&self, name: &str) -> AppResult<PathBuf> {
        validate_artifact_name(name)?;
        let path = self.backup_dir.join(name);
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "Backup artifact '{}' not found",
                name
            )));
        }
        Ok(path)
    }

    /// Delete one artifact by name
    pub async fn delete_artifact(&self, name: &str) -> AppResult<()> {
        let path = self.artifact_path(name)?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    /// Copy the SQLite database file into the backup directory
    async fn run_database_backup(&self) -> AppResult<BackupArtifact> {
        if !self.database_path.is_file() {
            return Err(AppError::Backup(format!(
                "database file {} does not exist",
                self.database_path.display()
            )));
        }

        tokio::fs::create_dir_all(&self.backup_dir).await?;
        let name = format!(
            "{}{}.db",
            DATABASE_PREFIX,
            Local::now().format(TIMESTAMP_FORMAT)
        );
        let target = self.backup_dir.join(&name);
        tokio::fs::copy(&self.database_path, &target).await?;

        self.artifact_from_path(&target)
    }

    /// Export all spare parts, including the derived inspection fields, as
    /// one CSV artifact
    async fn run_export_backup(&self) -> AppResult<BackupArtifact> {
        let parts = self
            .repository
            .spare_parts
            .list(&SparePartFilter::default())
            .await?;
        let today = Local::now().date_naive();

        tokio::fs::create_dir_all(&self.backup_dir).await?;
        let name = format!(
            "{}{}.csv",
            EXPORT_PREFIX,
            Local::now().format(TIMESTAMP_FORMAT)
        );
        let target = self.backup_dir.join(&name);

        let mut writer = csv::Writer::from_path(&target)
            .map_err(|e| AppError::Backup(format!("could not create export file: {}", e)))?;
        writer
            .write_record([
                "id",
                "name",
                "asset_number",
                "device_type",
                "last_inspection_date",
                "next_inspection_date",
                "days_to_inspection",
                "inspection_status",
                "usage_status",
                "storage_location",
                "specifications",
                "manufacturer",
                "purchase_date",
                "warranty_period",
                "unit_price",
                "ownership",
                "product_number",
                "remarks",
            ])
            .map_err(|e| AppError::Backup(e.to_string()))?;

        for part in parts {
            let outlook =
                lifecycle::assess(part.last_inspection_date, part.next_inspection_date, today);
            writer
                .write_record([
                    part.id.to_string(),
                    part.name,
                    part.asset_number,
                    part.device_type.unwrap_or_default(),
                    date_field(part.last_inspection_date),
                    date_field(part.next_inspection_date),
                    outlook
                        .days_to_inspection
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    outlook.inspection_status.to_string(),
                    part.usage_status,
                    part.storage_location.unwrap_or_default(),
                    part.specifications.unwrap_or_default(),
                    part.manufacturer.unwrap_or_default(),
                    date_field(part.purchase_date),
                    part.warranty_period.map(|w| w.to_string()).unwrap_or_default(),
                    part.unit_price.map(|p| p.to_string()).unwrap_or_default(),
                    part.ownership.unwrap_or_default(),
                    part.product_number.unwrap_or_default(),
                    part.remarks.unwrap_or_default(),
                ])
                .map_err(|e| AppError::Backup(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| AppError::Backup(e.to_string()))?;

        self.artifact_from_path(&target)
    }

    fn artifact_from_path(&self, path: &Path) -> AppResult<BackupArtifact> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::Internal(format!("bad artifact path {}", path.display())))?;
        let kind = recognized_kind(&name)
            .ok_or_else(|| AppError::Validation(format!("Invalid artifact name '{}'", name)))?;

        let metadata = std::fs::metadata(path)?;
        let created_at = timestamp_from_name(&name).unwrap_or_else(|| {
            metadata
                .modified()
                .map(DateTime::<Local>::from)
                .unwrap_or_else(|_| Local::now())
        });

        Ok(BackupArtifact {
            name,
            kind: kind.to_string(),
            size_bytes: metadata.len(),
            created_at,
        })
    }
}

fn date_field(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn recognized_kind(name: &str) -> Option<&'static str> {
    if name.starts_with(DATABASE_PREFIX) {
        Some("database")
    } else if name.starts_with(EXPORT_PREFIX) {
        Some("excel")
    } else {
        None
    }
}

/// Reject names outside the two recognized prefixes or carrying path
/// components, before any filesystem access happens.
pub fn validate_artifact_name(name: &str) -> AppResult<()> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::Validation(format!(
            "Invalid backup artifact name '{}'",
            name
        )));
    }
    if recognized_kind(name).is_none() {
        return Err(AppError::Validation(format!(
            "Unrecognized backup artifact name '{}'",
            name
        )));
    }
    Ok(())
}

/// Artifact creation time from the timestamp embedded in its name
fn timestamp_from_name(name: &str) -> Option<DateTime<Local>> {
    let rest = name
        .strip_prefix(DATABASE_PREFIX)
        .or_else(|| name.strip_prefix(EXPORT_PREFIX))?;
    let stem = rest.split('.').next()?;
    let naive = NaiveDateTime::parse_from_str(stem, TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_validate_artifact_name_accepts_recognized_prefixes() {
        assert!(validate_artifact_name("database_backup_20240101_020000.db").is_ok());
        assert!(validate_artifact_name("excel_backup_20240101_020000.csv").is_ok());
    }

    #[test]
    fn test_validate_artifact_name_rejects_traversal() {
        assert!(validate_artifact_name("../etc/passwd").is_err());
        assert!(validate_artifact_name("database_backup_..\\x.db").is_err());
        assert!(validate_artifact_name("database_backup_/tmp/x.db").is_err());
    }

    #[test]
    fn test_validate_artifact_name_rejects_unknown_prefix() {
        assert!(validate_artifact_name("spare_parts.db").is_err());
        assert!(validate_artifact_name("notes.txt").is_err());
    }

    #[test]
    fn test_timestamp_from_name() {
        let ts = timestamp_from_name("database_backup_20240315_021530.db").unwrap();
        assert_eq!(
            (ts.year(), ts.month(), ts.day(), ts.hour(), ts.minute()),
            (2024, 3, 15, 2, 15)
        );
        assert!(timestamp_from_name("database_backup_garbage.db").is_none());
    }
}
