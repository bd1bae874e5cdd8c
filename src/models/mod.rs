//! Data models for Sparetrack

pub mod backup;
pub mod enums;
pub mod maintenance_record;
pub mod response;
pub mod spare_part;

use serde::{Deserialize, Deserializer};

// Re-export commonly used types
pub use backup::{BackupArtifact, BackupConfig, BackupJobReport, UpdateBackupConfig};
pub use enums::{BackupKind, InspectionStatus};
pub use maintenance_record::{CreateMaintenanceRecord, MaintenanceRecord, UpdateMaintenanceRecord};
pub use response::ApiResponse;
pub use spare_part::{
    CreateSparePart, SparePart, SparePartDetails, SparePartFilter, UpdateSparePart,
};

/// Deserializer for tri-state update fields: a field that is absent stays
/// `None` via `#[serde(default)]`, while a present field (including an
/// explicit JSON `null`) becomes `Some(inner)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_update_fields_distinguish_absent_from_null() {
        let update: UpdateSparePart = serde_json::from_value(json!({
            "name": "Pressure gauge",
            "next_inspection_date": null,
            "manufacturer": "Acme"
        }))
        .unwrap();

        assert_eq!(update.name.as_deref(), Some("Pressure gauge"));
        // explicit null clears the column
        assert_eq!(update.next_inspection_date, Some(None));
        assert_eq!(update.manufacturer, Some(Some("Acme".to_string())));
        // absent fields stay untouched
        assert_eq!(update.last_inspection_date, None);
        assert_eq!(update.device_type, None);
    }

    #[test]
    fn test_update_date_value_parses() {
        let update: UpdateSparePart = serde_json::from_value(json!({
            "last_inspection_date": "2024-01-15"
        }))
        .unwrap();
        assert_eq!(
            update.last_inspection_date,
            Some(Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()))
        );
    }
}
