//! Spare part model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::lifecycle;
use crate::models::enums::InspectionStatus;

/// Spare part record as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SparePart {
    pub id: i64,
    pub name: String,
    /// Unique external asset code
    pub asset_number: String,
    pub device_type: Option<String>,
    pub last_inspection_date: Option<NaiveDate>,
    pub next_inspection_date: Option<NaiveDate>,
    /// Free-form usage status (in_stock, in_use, under_repair, scrapped)
    pub usage_status: String,
    pub storage_location: Option<String>,
    pub specifications: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    /// Warranty period in months
    pub warranty_period: Option<i64>,
    pub unit_price: Option<f64>,
    pub remarks: Option<String>,
    pub ownership: Option<String>,
    pub product_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Spare part plus the derived inspection fields, as returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct SparePartDetails {
    #[serde(flatten)]
    pub part: SparePart,
    pub days_to_inspection: Option<i64>,
    pub inspection_progress: f64,
    pub inspection_status: InspectionStatus,
}

impl SparePartDetails {
    /// Attach the derived lifecycle fields, computed against `today`.
    pub fn derive(part: SparePart, today: NaiveDate) -> Self {
        let outlook =
            lifecycle::assess(part.last_inspection_date, part.next_inspection_date, today);
        Self {
            part,
            days_to_inspection: outlook.days_to_inspection,
            inspection_progress: outlook.inspection_progress,
            inspection_status: outlook.inspection_status,
        }
    }
}

/// Create spare part request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSparePart {
    pub name: String,
    pub asset_number: String,
    pub device_type: Option<String>,
    pub last_inspection_date: Option<NaiveDate>,
    pub next_inspection_date: Option<NaiveDate>,
    pub usage_status: Option<String>,
    pub storage_location: Option<String>,
    pub specifications: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_period: Option<i64>,
    pub unit_price: Option<f64>,
    pub remarks: Option<String>,
    pub ownership: Option<String>,
    pub product_number: Option<String>,
}

/// Update spare part request with partial-update semantics.
///
/// Outer `None` = field absent from the request, leave the column untouched.
/// `Some(None)` = explicit null, clear the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSparePart {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub device_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub last_inspection_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub next_inspection_date: Option<Option<NaiveDate>>,
    pub usage_status: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub storage_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub specifications: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub manufacturer: Option<Option<String>>,
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub warranty_period: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub unit_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub remarks: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub ownership: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub product_number: Option<Option<String>>,
}

/// List filter for spare parts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparePartFilter {
    /// Matches name, asset number, or storage location
    pub keyword: Option<String>,
    pub device_type: Option<String>,
    pub usage_status: Option<String>,
    /// Substring match
    pub storage_location: Option<String>,
    pub ownership: Option<String>,
    /// Derived urgency band, applied after the query
    pub inspection_status: Option<InspectionStatus>,
}
