//! Maintenance records repository

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::maintenance_record::{CreateMaintenanceRecord, MaintenanceRecord},
};

#[derive(Clone)]
pub struct MaintenanceRecordsRepository {
    pool: SqlitePool,
}

impl MaintenanceRecordsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List records, optionally for one spare part, newest first
    pub async fn list(&self, spare_part_id: Option<i64>) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = if let Some(part_id) = spare_part_id {
            sqlx::query_as::<_, MaintenanceRecord>(
                "SELECT * FROM maintenance_records WHERE spare_part_id = ?
                 ORDER BY maintenance_date DESC, id DESC",
            )
            .bind(part_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, MaintenanceRecord>(
                "SELECT * FROM maintenance_records ORDER BY maintenance_date DESC, id DESC",
            )
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows)
    }

    /// Get maintenance record by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<MaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    /// Insert a record. `next_inspection_date` is the value derived by the
    /// service, not caller input.
    pub async fn create(
        &self,
        data: &CreateMaintenanceRecord,
        next_inspection_date: Option<NaiveDate>,
    ) -> AppResult<MaintenanceRecord> {
        let row = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (
                spare_part_id, maintenance_date, operator_name, maintenance_type,
                description, last_inspection_date, inspection_validity_months,
                next_inspection_date, cost, remarks, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.spare_part_id)
        .bind(data.maintenance_date)
        .bind(&data.operator_name)
        .bind(&data.maintenance_type)
        .bind(&data.description)
        .bind(data.last_inspection_date)
        .bind(data.inspection_validity_months)
        .bind(next_inspection_date)
        .bind(data.cost)
        .bind(&data.remarks)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Rewrite the mutable columns of a record in place. The service merges
    /// the partial update and re-derives `next_inspection_date` first.
    pub async fn save(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records SET
                maintenance_date = ?, operator_name = ?, maintenance_type = ?,
                description = ?, last_inspection_date = ?,
                inspection_validity_months = ?, next_inspection_date = ?,
                cost = ?, remarks = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(record.maintenance_date)
        .bind(&record.operator_name)
        .bind(&record.maintenance_type)
        .bind(&record.description)
        .bind(record.last_inspection_date)
        .bind(record.inspection_validity_months)
        .bind(record.next_inspection_date)
        .bind(record.cost)
        .bind(&record.remarks)
        .bind(record.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", record.id)))
    }

    /// Delete a record. The parent part's inspection dates are deliberately
    /// not recomputed.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Maintenance record {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Count records attached to one spare part
    pub async fn count_for_part(&self, spare_part_id: i64) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_records WHERE spare_part_id = ?")
                .bind(spare_part_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
