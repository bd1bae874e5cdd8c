//! Backup configuration repository
//!
//! The configuration lives in a singleton row (id = 1) and is created with
//! defaults on first read.

use sqlx::{Row, SqlitePool};

use crate::{
    error::AppResult,
    models::{backup::BackupConfig, enums::BackupKind},
};

#[derive(Clone)]
pub struct BackupConfigRepository {
    pool: SqlitePool,
}

impl BackupConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the configuration, inserting the defaults first if the row is
    /// missing.
    pub async fn get_or_create(&self) -> AppResult<BackupConfig> {
        if let Some(config) = self.get().await? {
            return Ok(config);
        }

        let defaults = BackupConfig::default();
        self.save(&defaults).await?;
        Ok(defaults)
    }

    async fn get(&self) -> AppResult<Option<BackupConfig>> {
        let row = sqlx::query(
            "SELECT auto_backup_enabled, backup_time, keep_days, backup_kind
             FROM backup_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| BackupConfig {
            auto_backup_enabled: row.get::<i64, _>("auto_backup_enabled") != 0,
            backup_time: row.get("backup_time"),
            keep_days: row.get("keep_days"),
            backup_kind: BackupKind::from_db(row.get::<String, _>("backup_kind").as_str()),
        }))
    }

    /// Rewrite the singleton row wholesale
    pub async fn save(&self, config: &BackupConfig) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO backup_config (id, auto_backup_enabled, backup_time, keep_days, backup_kind)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                auto_backup_enabled = excluded.auto_backup_enabled,
                backup_time = excluded.backup_time,
                keep_days = excluded.keep_days,
                backup_kind = excluded.backup_kind
            "#,
        )
        .bind(config.auto_backup_enabled as i64)
        .bind(&config.backup_time)
        .bind(config.keep_days)
        .bind(config.backup_kind.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
