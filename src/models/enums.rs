//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// InspectionStatus
// ---------------------------------------------------------------------------

/// Urgency band derived from the days remaining until the next inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    /// No next inspection date on record
    NoInspection,
    /// Due date is in the past
    Expired,
    /// Due within 3 month-equivalents
    Urgent,
    /// Due within 3 to 6 month-equivalents
    Warning,
    /// Due in more than 6 month-equivalents
    Normal,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::NoInspection => "no_inspection",
            InspectionStatus::Expired => "expired",
            InspectionStatus::Urgent => "urgent",
            InspectionStatus::Warning => "warning",
            InspectionStatus::Normal => "normal",
        }
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_inspection" => Ok(InspectionStatus::NoInspection),
            "expired" => Ok(InspectionStatus::Expired),
            "urgent" => Ok(InspectionStatus::Urgent),
            "warning" => Ok(InspectionStatus::Warning),
            "normal" => Ok(InspectionStatus::Normal),
            other => Err(format!("unknown inspection status '{}'", other)),
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BackupKind
// ---------------------------------------------------------------------------

/// Which snapshot jobs a backup run should execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    /// Raw copy of the SQLite database file
    Database,
    /// Structured CSV export only
    ExportOnly,
    /// Both jobs
    Both,
}

impl BackupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupKind::Database => "database",
            BackupKind::ExportOnly => "export_only",
            BackupKind::Both => "both",
        }
    }

    /// Parse the persisted form, falling back to `Both` for unknown values
    /// so that a hand-edited config row never disables backups silently.
    pub fn from_db(value: &str) -> Self {
        match value {
            "database" => BackupKind::Database,
            "export_only" => BackupKind::ExportOnly,
            _ => BackupKind::Both,
        }
    }

    pub fn includes_database(&self) -> bool {
        matches!(self, BackupKind::Database | BackupKind::Both)
    }

    pub fn includes_export(&self) -> bool {
        matches!(self, BackupKind::ExportOnly | BackupKind::Both)
    }
}

impl std::fmt::Display for BackupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_kind_roundtrip() {
        for kind in [BackupKind::Database, BackupKind::ExportOnly, BackupKind::Both] {
            assert_eq!(BackupKind::from_db(kind.as_str()), kind);
        }
        assert_eq!(BackupKind::from_db("garbage"), BackupKind::Both);
    }

    #[test]
    fn test_backup_kind_job_selection() {
        assert!(BackupKind::Both.includes_database());
        assert!(BackupKind::Both.includes_export());
        assert!(!BackupKind::ExportOnly.includes_database());
        assert!(!BackupKind::Database.includes_export());
    }
}
