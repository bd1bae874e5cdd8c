//! Schema version migrator
//!
//! Tracks a monotonic schema version in the `db_version` table and applies
//! pending migration steps in ascending order at startup. Every step uses
//! check-before-create SQL so that a crash mid-migration is recoverable by
//! simply re-running from the recorded version. A database reporting a
//! version newer than this build is left untouched with a warning.

use std::future::Future;

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// Schema version this build requires
pub const TARGET_VERSION: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Unchecked,
    UpToDate,
    Migrating,
    Failed,
}

pub struct Migrator {
    pool: SqlitePool,
    state: MigrationState,
}

impl Migrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            state: MigrationState::Unchecked,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Run the migration check. Called once at process start; a `Failed`
    /// result must abort startup.
    pub async fn run(&mut self) -> AppResult<MigrationState> {
        self.ensure_version_table().await?;

        let current = self.current_version().await?;
        tracing::info!(current, target = TARGET_VERSION, "checked schema version");

        if current == TARGET_VERSION {
            self.state = MigrationState::UpToDate;
            return Ok(self.state);
        }

        if current > TARGET_VERSION {
            tracing::warn!(
                current,
                target = TARGET_VERSION,
                "database schema is newer than this build; proceeding without changes"
            );
            self.state = MigrationState::UpToDate;
            return Ok(self.state);
        }

        self.state = MigrationState::Migrating;
        let pool = self.pool.clone();

        if current < 1 {
            self.step(1, "baseline tables", migrate_to_v1(&pool)).await?;
        }
        if current < 2 {
            self.step(2, "spare part and maintenance record indexes", migrate_to_v2(&pool))
                .await?;
        }

        self.state = MigrationState::UpToDate;
        tracing::info!(version = TARGET_VERSION, "schema migration completed");
        Ok(self.state)
    }

    /// Current schema version: the highest recorded entry, 0 when the log
    /// is empty.
    pub async fn current_version(&self) -> AppResult<i64> {
        let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM db_version")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }

    async fn ensure_version_table(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS db_version (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                version INTEGER NOT NULL,
                description TEXT,
                migrated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Apply one step and append its version-log entry. Any error leaves
    /// the migrator in `Failed`.
    async fn step<F>(&mut self, version: i64, description: &str, apply: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        tracing::info!(version, description, "applying migration step");

        if let Err(e) = apply.await {
            self.state = MigrationState::Failed;
            return Err(AppError::Migration(format!(
                "migration step {} ({}) failed: {}",
                version, description, e
            )));
        }

        let recorded = sqlx::query("INSERT INTO db_version (version, description) VALUES (?, ?)")
            .bind(version)
            .bind(description)
            .execute(&self.pool)
            .await;
        if let Err(e) = recorded {
            self.state = MigrationState::Failed;
            return Err(AppError::Migration(format!(
                "recording migration step {} failed: {}",
                version, e
            )));
        }

        Ok(())
    }
}

/// Version 1: baseline tables
async fn migrate_to_v1(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS spare_parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            asset_number TEXT NOT NULL UNIQUE,
            device_type TEXT,
            last_inspection_date DATE,
            next_inspection_date DATE,
            usage_status TEXT NOT NULL DEFAULT 'in_stock',
            storage_location TEXT,
            specifications TEXT,
            manufacturer TEXT,
            purchase_date DATE,
            warranty_period INTEGER,
            unit_price REAL,
            remarks TEXT,
            ownership TEXT,
            product_number TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS maintenance_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            spare_part_id INTEGER NOT NULL REFERENCES spare_parts (id),
            maintenance_date DATE NOT NULL,
            operator_name TEXT NOT NULL,
            maintenance_type TEXT,
            description TEXT,
            last_inspection_date DATE,
            inspection_validity_months INTEGER,
            next_inspection_date DATE,
            cost REAL,
            remarks TEXT,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS backup_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            auto_backup_enabled INTEGER NOT NULL,
            backup_time TEXT NOT NULL,
            keep_days INTEGER NOT NULL,
            backup_kind TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Version 2: performance indexes for the list filters and the cascade path
async fn migrate_to_v2(pool: &SqlitePool) -> AppResult<()> {
    let indexes = [
        ("idx_spare_parts_name", "spare_parts", "name"),
        ("idx_spare_parts_asset_number", "spare_parts", "asset_number"),
        (
            "idx_spare_parts_next_inspection_date",
            "spare_parts",
            "next_inspection_date",
        ),
        ("idx_spare_parts_usage_status", "spare_parts", "usage_status"),
        (
            "idx_spare_parts_storage_location",
            "spare_parts",
            "storage_location",
        ),
        ("idx_spare_parts_ownership", "spare_parts", "ownership"),
        (
            "idx_maintenance_records_spare_part_id",
            "maintenance_records",
            "spare_part_id",
        ),
    ];

    for (index, table, column) in indexes {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            index, table, column
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}
