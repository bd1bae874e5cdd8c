//! Backup configuration and artifact models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::enums::BackupKind;

/// Singleton backup configuration row, read by the scheduler on every
/// (re)start of the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupConfig {
    pub auto_backup_enabled: bool,
    /// Daily fire time, wall clock, "HH:MM"
    pub backup_time: String,
    /// Artifacts older than this many days are swept
    pub keep_days: i64,
    pub backup_kind: BackupKind,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            auto_backup_enabled: true,
            backup_time: "02:00".to_string(),
            keep_days: 30,
            backup_kind: BackupKind::Both,
        }
    }
}

/// Partial backup configuration update; the row is rewritten wholesale
/// after merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBackupConfig {
    pub auto_backup_enabled: Option<bool>,
    pub backup_time: Option<String>,
    pub keep_days: Option<i64>,
    pub backup_kind: Option<BackupKind>,
}

/// One file produced by a snapshot job, enumerated from the backup directory
#[derive(Debug, Clone, Serialize)]
pub struct BackupArtifact {
    pub name: String,
    /// "database" or "excel", from the name prefix
    pub kind: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Local>,
}

/// Per-job outcome of a backup run. One job's failure never aborts the
/// other job or the retention sweep.
#[derive(Debug, Clone, Serialize)]
pub struct BackupJobReport {
    pub job: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<BackupArtifact>,
}

impl BackupJobReport {
    pub fn ok(job: &str, artifact: BackupArtifact) -> Self {
        Self {
            job: job.to_string(),
            success: true,
            message: format!("{} backup completed", job),
            artifact: Some(artifact),
        }
    }

    pub fn failed(job: &str, error: impl std::fmt::Display) -> Self {
        Self {
            job: job.to_string(),
            success: false,
            message: error.to_string(),
            artifact: None,
        }
    }
}
