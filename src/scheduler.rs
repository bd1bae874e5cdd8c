//! Backup scheduler
//!
//! One recurring job fires once per day at the configured wall-clock time.
//! The handle is owned by the process-lifetime context; reconfiguration
//! always tears the previous task down before spawning a replacement, so at
//! most one job is ever scheduled.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime};
use tokio::task::JoinHandle;

use crate::{
    error::{AppError, AppResult},
    models::backup::BackupConfig,
    services::backup::BackupService,
};

pub struct SchedulerHandle {
    job: Mutex<Option<JoinHandle<()>>>,
}

impl SchedulerHandle {
    pub fn new() -> Self {
        Self {
            job: Mutex::new(None),
        }
    }

    /// Tear down the current job and, if automatic backups are enabled,
    /// spawn a new one on the configured schedule.
    pub fn reschedule(&self, backup: BackupService, config: &BackupConfig) -> AppResult<()> {
        self.stop();

        if !config.auto_backup_enabled {
            tracing::info!("automatic backups disabled, no job scheduled");
            return Ok(());
        }

        let fire_time = parse_backup_time(&config.backup_time)?;
        let handle = tokio::spawn(async move {
            loop {
                let wait = duration_until_next(fire_time, Local::now());
                tracing::info!(
                    seconds_until_fire = wait.as_secs(),
                    "automatic backup scheduled"
                );
                tokio::time::sleep(wait).await;
                backup.run_scheduled_cycle().await;
            }
        });

        *self.lock_job() = Some(handle);
        tracing::info!(time = %config.backup_time, "automatic backup job scheduled");
        Ok(())
    }

    /// Stop the timer. An in-flight snapshot is abandoned.
    pub fn stop(&self) {
        if let Some(handle) = self.lock_job().take() {
            handle.abort();
            tracing::info!("automatic backup job stopped");
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.lock_job().is_some()
    }

    fn lock_job(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // Nothing panics while holding the lock; recover from poison anyway
        self.job.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SchedulerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a "HH:MM" wall-clock time
pub fn parse_backup_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        AppError::Validation(format!("Invalid backup time '{}', expected HH:MM", value))
    })
}

/// Time to sleep until the next occurrence of `fire_time` after `now`.
/// A fire time equal to `now` rolls over to the next day.
fn duration_until_next(fire_time: NaiveTime, now: DateTime<Local>) -> Duration {
    let now_naive = now.naive_local();
    let mut candidate = now_naive.date().and_time(fire_time);
    if candidate <= now_naive {
        candidate = candidate + chrono::Duration::days(1);
    }
    (candidate - now_naive).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_parse_backup_time() {
        assert_eq!(
            parse_backup_time("02:30").unwrap(),
            NaiveTime::from_hms_opt(2, 30, 0).unwrap()
        );
        assert!(parse_backup_time("25:00").is_err());
        assert!(parse_backup_time("soon").is_err());
    }

    #[test]
    fn test_fire_later_today() {
        let wait = duration_until_next(
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            local(2024, 6, 1, 14, 0),
        );
        assert_eq!(wait, Duration::from_secs(3600));
    }

    #[test]
    fn test_fire_rolls_to_next_day() {
        let wait = duration_until_next(
            NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
            local(2024, 6, 1, 2, 0),
        );
        assert_eq!(wait, Duration::from_secs(24 * 3600));
    }
}
