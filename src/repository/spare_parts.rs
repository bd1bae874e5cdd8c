//! Spare parts repository

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::spare_part::{CreateSparePart, SparePart, SparePartFilter, UpdateSparePart},
};

#[derive(Clone)]
pub struct SparePartsRepository {
    pool: SqlitePool,
}

impl SparePartsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List spare parts matching the stored-field filters. The derived
    /// inspection-status band is applied by the service after this query.
    pub async fn list(&self, filter: &SparePartFilter) -> AppResult<Vec<SparePart>> {
        let mut conditions: Vec<&str> = Vec::new();

        if filter.keyword.is_some() {
            conditions.push("(name LIKE ?1 OR asset_number LIKE ?1 OR storage_location LIKE ?1)");
        }
        if filter.device_type.is_some() {
            conditions.push("device_type = ?");
        }
        if filter.usage_status.is_some() {
            conditions.push("usage_status = ?");
        }
        if filter.storage_location.is_some() {
            conditions.push("storage_location LIKE ?");
        }
        if filter.ownership.is_some() {
            conditions.push("ownership = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT * FROM spare_parts {} ORDER BY id", where_clause);

        let mut builder = sqlx::query_as::<_, SparePart>(&query);
        if let Some(ref keyword) = filter.keyword {
            builder = builder.bind(format!("%{}%", keyword));
        }
        if let Some(ref device_type) = filter.device_type {
            builder = builder.bind(device_type);
        }
        if let Some(ref usage_status) = filter.usage_status {
            builder = builder.bind(usage_status);
        }
        if let Some(ref location) = filter.storage_location {
            builder = builder.bind(format!("%{}%", location));
        }
        if let Some(ref ownership) = filter.ownership {
            builder = builder.bind(ownership);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Parts with a due date on record, soonest first
    pub async fn list_pending_inspection(&self) -> AppResult<Vec<SparePart>> {
        let rows = sqlx::query_as::<_, SparePart>(
            "SELECT * FROM spare_parts WHERE next_inspection_date IS NOT NULL
             ORDER BY next_inspection_date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get spare part by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<SparePart> {
        sqlx::query_as::<_, SparePart>("SELECT * FROM spare_parts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spare part {} not found", id)))
    }

    /// Create spare part; the asset number must not already exist
    pub async fn create(&self, data: &CreateSparePart) -> AppResult<SparePart> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM spare_parts WHERE asset_number = ?)")
                .bind(&data.asset_number)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Err(AppError::Duplicate(format!(
                "Asset number '{}' already exists",
                data.asset_number
            )));
        }

        let now = Utc::now();
        let row = sqlx::query_as::<_, SparePart>(
            r#"
            INSERT INTO spare_parts (
                name, asset_number, device_type, last_inspection_date,
                next_inspection_date, usage_status, storage_location,
                specifications, manufacturer, purchase_date, warranty_period,
                unit_price, remarks, ownership, product_number, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.asset_number)
        .bind(&data.device_type)
        .bind(data.last_inspection_date)
        .bind(data.next_inspection_date)
        .bind(data.usage_status.as_deref().unwrap_or("in_stock"))
        .bind(&data.storage_location)
        .bind(&data.specifications)
        .bind(&data.manufacturer)
        .bind(data.purchase_date)
        .bind(data.warranty_period)
        .bind(data.unit_price)
        .bind(&data.remarks)
        .bind(&data.ownership)
        .bind(&data.product_number)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update spare part. Absent fields are left untouched; fields carrying
    /// an explicit null clear the column. `updated_at` is always stamped.
    pub async fn update(&self, id: i64, data: &UpdateSparePart) -> AppResult<SparePart> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = ?".to_string()];

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ?", $name));
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.device_type, "device_type");
        add_field!(data.last_inspection_date, "last_inspection_date");
        add_field!(data.next_inspection_date, "next_inspection_date");
        add_field!(data.usage_status, "usage_status");
        add_field!(data.storage_location, "storage_location");
        add_field!(data.specifications, "specifications");
        add_field!(data.manufacturer, "manufacturer");
        add_field!(data.purchase_date, "purchase_date");
        add_field!(data.warranty_period, "warranty_period");
        add_field!(data.unit_price, "unit_price");
        add_field!(data.remarks, "remarks");
        add_field!(data.ownership, "ownership");
        add_field!(data.product_number, "product_number");

        let query = format!(
            "UPDATE spare_parts SET {} WHERE id = ? RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, SparePart>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.device_type);
        bind_field!(data.last_inspection_date);
        bind_field!(data.next_inspection_date);
        bind_field!(data.usage_status);
        bind_field!(data.storage_location);
        bind_field!(data.specifications);
        bind_field!(data.manufacturer);
        bind_field!(data.purchase_date);
        bind_field!(data.warranty_period);
        bind_field!(data.unit_price);
        bind_field!(data.remarks);
        bind_field!(data.ownership);
        bind_field!(data.product_number);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spare part {} not found", id)))
    }

    /// Delete a spare part and its dependent maintenance records in one
    /// explicit transaction. Destructive, no soft-delete.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM maintenance_records WHERE spare_part_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM spare_parts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Spare part {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Overwrite the part's inspection dates from a maintenance record.
    /// Only non-null record values are pushed; last write wins.
    pub async fn sync_inspection_dates(
        &self,
        id: i64,
        last_inspection_date: Option<NaiveDate>,
        next_inspection_date: Option<NaiveDate>,
    ) -> AppResult<()> {
        let mut sets = vec!["updated_at = ?".to_string()];
        if last_inspection_date.is_some() {
            sets.push("last_inspection_date = ?".to_string());
        }
        if next_inspection_date.is_some() {
            sets.push("next_inspection_date = ?".to_string());
        }

        let query = format!("UPDATE spare_parts SET {} WHERE id = ?", sets.join(", "));
        let mut builder = sqlx::query(&query).bind(Utc::now());
        if let Some(last) = last_inspection_date {
            builder = builder.bind(last);
        }
        if let Some(next) = next_inspection_date {
            builder = builder.bind(next);
        }

        let result = builder.bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Spare part {} not found", id)));
        }
        Ok(())
    }
}
