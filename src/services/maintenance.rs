//! Maintenance record service
//!
//! Owns the synchronization rule between maintenance records and their
//! parent spare part: a record carrying an inspection date and a validity
//! period gets a derived due date, and both dates are pushed onto the parent
//! unconditionally. Last write wins: saving an older record after a newer
//! one overwrites the parent with the older dates. Deleting a record does
//! not recompute the parent.

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    lifecycle,
    models::maintenance_record::{
        CreateMaintenanceRecord, MaintenanceRecord, UpdateMaintenanceRecord,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, spare_part_id: Option<i64>) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.maintenance_records.list(spare_part_id).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<MaintenanceRecord> {
        self.repository.maintenance_records.get_by_id(id).await
    }

    /// Create a record and propagate its inspection dates to the parent
    pub async fn create(&self, data: CreateMaintenanceRecord) -> AppResult<MaintenanceRecord> {
        if data.operator_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Operator name is required".to_string(),
            ));
        }

        // The parent must exist before the record is written
        self.repository
            .spare_parts
            .get_by_id(data.spare_part_id)
            .await?;

        let next_inspection_date =
            derive_next_inspection(data.last_inspection_date, data.inspection_validity_months)?;

        let record = self
            .repository
            .maintenance_records
            .create(&data, next_inspection_date)
            .await?;

        self.propagate_to_part(&record).await?;
        Ok(record)
    }

    /// Apply a partial update, re-derive the due date, and propagate
    pub async fn update(
        &self,
        id: i64,
        update: UpdateMaintenanceRecord,
    ) -> AppResult<MaintenanceRecord> {
        let mut record = self.repository.maintenance_records.get_by_id(id).await?;

        if let Some(maintenance_date) = update.maintenance_date {
            record.maintenance_date = maintenance_date;
        }
        if let Some(operator_name) = update.operator_name {
            if operator_name.trim().is_empty() {
                return Err(AppError::Validation(
                    "Operator name must not be empty".to_string(),
                ));
            }
            record.operator_name = operator_name;
        }
        if let Some(maintenance_type) = update.maintenance_type {
            record.maintenance_type = maintenance_type;
        }
        if let Some(description) = update.description {
            record.description = description;
        }
        if let Some(last_inspection_date) = update.last_inspection_date {
            record.last_inspection_date = last_inspection_date;
        }
        if let Some(validity) = update.inspection_validity_months {
            record.inspection_validity_months = validity;
        }
        if let Some(cost) = update.cost {
            record.cost = cost;
        }
        if let Some(remarks) = update.remarks {
            record.remarks = remarks;
        }

        // Re-derive only when both inputs are present; a record that lost
        // one of them keeps its previously stored due date.
        if let Some(next) = derive_next_inspection(
            record.last_inspection_date,
            record.inspection_validity_months,
        )? {
            record.next_inspection_date = Some(next);
        }

        let record = self.repository.maintenance_records.save(&record).await?;
        self.propagate_to_part(&record).await?;
        Ok(record)
    }

    /// Delete a record. The parent's inspection dates are left as-is.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.maintenance_records.delete(id).await
    }

    /// Push the record's non-null inspection dates onto the parent. The
    /// record has already been persisted at this point, so a failure here is
    /// reported as an inconsistency rather than swallowed.
    async fn propagate_to_part(&self, record: &MaintenanceRecord) -> AppResult<()> {
        if record.last_inspection_date.is_none() && record.next_inspection_date.is_none() {
            return Ok(());
        }

        self.repository
            .spare_parts
            .sync_inspection_dates(
                record.spare_part_id,
                record.last_inspection_date,
                record.next_inspection_date,
            )
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "maintenance record {} was saved but spare part {} was not updated: {}",
                    record.id, record.spare_part_id, e
                ))
            })
    }
}

/// `last_inspection_date + inspection_validity_months`, calendar months
fn derive_next_inspection(
    last_inspection_date: Option<NaiveDate>,
    inspection_validity_months: Option<i64>,
) -> AppResult<Option<NaiveDate>> {
    match (last_inspection_date, inspection_validity_months) {
        (Some(last), Some(months)) => {
            if months < 0 {
                return Err(AppError::Validation(
                    "Inspection validity period must not be negative".to_string(),
                ));
            }
            let months = u32::try_from(months).map_err(|_| {
                AppError::Validation("Inspection validity period is too large".to_string())
            })?;
            lifecycle::add_months(last, months)
                .map(Some)
                .ok_or_else(|| {
                    AppError::Validation("Derived inspection date is out of range".to_string())
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_derive_next_inspection() {
        let next = derive_next_inspection(Some(d(2024, 1, 15)), Some(6)).unwrap();
        assert_eq!(next, Some(d(2024, 7, 15)));
    }

    #[test]
    fn test_derive_requires_both_inputs() {
        assert_eq!(derive_next_inspection(Some(d(2024, 1, 15)), None).unwrap(), None);
        assert_eq!(derive_next_inspection(None, Some(6)).unwrap(), None);
    }

    #[test]
    fn test_derive_rejects_negative_validity() {
        assert!(derive_next_inspection(Some(d(2024, 1, 15)), Some(-1)).is_err());
    }
}
