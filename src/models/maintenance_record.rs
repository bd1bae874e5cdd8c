//! Maintenance record model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maintenance / calibration event for one spare part
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub spare_part_id: i64,
    pub maintenance_date: NaiveDate,
    pub operator_name: String,
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    /// Inspection performed as part of this maintenance, if any
    pub last_inspection_date: Option<NaiveDate>,
    /// Validity of that inspection in calendar months
    pub inspection_validity_months: Option<i64>,
    /// Derived from `last_inspection_date + inspection_validity_months`
    pub next_inspection_date: Option<NaiveDate>,
    pub cost: Option<f64>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create maintenance record request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceRecord {
    pub spare_part_id: i64,
    pub maintenance_date: NaiveDate,
    pub operator_name: String,
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub last_inspection_date: Option<NaiveDate>,
    pub inspection_validity_months: Option<i64>,
    pub cost: Option<f64>,
    pub remarks: Option<String>,
}

/// Update maintenance record request (identity and parent are immutable)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaintenanceRecord {
    pub maintenance_date: Option<NaiveDate>,
    pub operator_name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub maintenance_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub last_inspection_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub inspection_validity_months: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub cost: Option<Option<f64>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub remarks: Option<Option<String>>,
}
