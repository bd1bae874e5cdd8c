//! Spare parts service

use chrono::Local;

use crate::{
    error::{AppError, AppResult},
    models::spare_part::{CreateSparePart, SparePartDetails, SparePartFilter, UpdateSparePart},
    repository::Repository,
};

#[derive(Clone)]
pub struct SparePartsService {
    repository: Repository,
}

impl SparePartsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List parts with derived inspection fields. The urgency-band filter is
    /// applied here since the band is not a stored column.
    pub async fn list(&self, filter: &SparePartFilter) -> AppResult<Vec<SparePartDetails>> {
        let today = Local::now().date_naive();
        let parts = self.repository.spare_parts.list(filter).await?;

        let mut details: Vec<SparePartDetails> = parts
            .into_iter()
            .map(|part| SparePartDetails::derive(part, today))
            .collect();

        if let Some(band) = filter.inspection_status {
            details.retain(|d| d.inspection_status == band);
        }

        Ok(details)
    }

    /// Parts with a due date on record, soonest due first
    pub async fn list_pending_inspection(&self) -> AppResult<Vec<SparePartDetails>> {
        let today = Local::now().date_naive();
        let parts = self.repository.spare_parts.list_pending_inspection().await?;
        Ok(parts
            .into_iter()
            .map(|part| SparePartDetails::derive(part, today))
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<SparePartDetails> {
        let part = self.repository.spare_parts.get_by_id(id).await?;
        Ok(SparePartDetails::derive(part, Local::now().date_naive()))
    }

    pub async fn create(&self, data: CreateSparePart) -> AppResult<SparePartDetails> {
        if data.name.trim().is_empty() || data.asset_number.trim().is_empty() {
            return Err(AppError::Validation(
                "Name and asset number are required".to_string(),
            ));
        }

        let part = self.repository.spare_parts.create(&data).await?;
        Ok(SparePartDetails::derive(part, Local::now().date_naive()))
    }

    pub async fn update(&self, id: i64, data: UpdateSparePart) -> AppResult<SparePartDetails> {
        if let Some(ref name) = data.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name must not be empty".to_string()));
            }
        }

        let part = self.repository.spare_parts.update(id, &data).await?;
        Ok(SparePartDetails::derive(part, Local::now().date_naive()))
    }

    /// Delete a part and everything attached to it
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.spare_parts.delete(id).await
    }
}
