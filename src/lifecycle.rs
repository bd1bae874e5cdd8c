//! Inspection lifecycle calculator
//!
//! Pure date arithmetic turning the inspection dates carried by a spare part
//! into a days-until-due counter, a remaining-cycle percentage, and an
//! urgency band. No I/O happens here; the repository and service layers feed
//! in stored dates plus "today".

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::models::enums::InspectionStatus;

/// Assumed calibration cycle when a part has a due date but no record of the
/// previous inspection.
pub const ASSUMED_CYCLE_DAYS: i64 = 365;

/// Derived inspection state for one part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InspectionOutlook {
    /// Signed days until the next inspection; `None` when no due date is set.
    pub days_to_inspection: Option<i64>,
    /// Remaining share of the cycle, 0..=100, rounded to 2 decimals.
    /// 100 means "just inspected", 0 means due or overdue.
    pub inspection_progress: f64,
    pub inspection_status: InspectionStatus,
}

/// Compute the derived inspection state from the stored dates.
pub fn assess(
    last_inspection_date: Option<NaiveDate>,
    next_inspection_date: Option<NaiveDate>,
    today: NaiveDate,
) -> InspectionOutlook {
    let Some(next) = next_inspection_date else {
        return InspectionOutlook {
            days_to_inspection: None,
            inspection_progress: 0.0,
            inspection_status: InspectionStatus::NoInspection,
        };
    };

    let days = (next - today).num_days();

    let progress = match last_inspection_date {
        Some(last) => {
            let total_days = (next - last).num_days();
            if total_days > 0 {
                ((days as f64 / total_days as f64) * 100.0).clamp(0.0, 100.0)
            } else if days < 0 {
                0.0
            } else {
                100.0
            }
        }
        // No previous inspection on record: assume a 365-day cycle
        None => {
            if days >= ASSUMED_CYCLE_DAYS {
                100.0
            } else if days < 0 {
                0.0
            } else {
                days as f64 / ASSUMED_CYCLE_DAYS as f64 * 100.0
            }
        }
    };

    InspectionOutlook {
        days_to_inspection: Some(days),
        inspection_progress: round2(progress),
        inspection_status: status_for(Some(days)),
    }
}

/// Band a days-until-due counter into an urgency status.
///
/// The month equivalents use flat 30-day blocks, not calendar months, so the
/// band edges fall at exactly 90 and 180 days.
pub fn status_for(days_to_inspection: Option<i64>) -> InspectionStatus {
    match days_to_inspection {
        None => InspectionStatus::NoInspection,
        Some(days) if days < 0 => InspectionStatus::Expired,
        Some(days) => {
            let months = days as f64 / 30.0;
            if months <= 3.0 {
                InspectionStatus::Urgent
            } else if months <= 6.0 {
                InspectionStatus::Warning
            } else {
                InspectionStatus::Normal
            }
        }
    }
}

/// Calendar-month addition used to derive a due date from the last
/// inspection plus a validity period. Clamps to the end of the target month
/// (2024-01-31 + 1 month = 2024-02-29). Returns `None` only when the result
/// would overflow chrono's date range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_no_due_date() {
        let outlook = assess(Some(d(2024, 1, 1)), None, d(2024, 6, 1));
        assert_eq!(outlook.days_to_inspection, None);
        assert_eq!(outlook.inspection_progress, 0.0);
        assert_eq!(outlook.inspection_status, InspectionStatus::NoInspection);
    }

    #[test]
    fn test_progress_zero_on_due_date() {
        let outlook = assess(Some(d(2024, 1, 1)), Some(d(2024, 7, 1)), d(2024, 7, 1));
        assert_eq!(outlook.days_to_inspection, Some(0));
        assert_eq!(outlook.inspection_progress, 0.0);
    }

    #[test]
    fn test_progress_full_on_inspection_date() {
        let outlook = assess(Some(d(2024, 1, 1)), Some(d(2024, 7, 1)), d(2024, 1, 1));
        assert_eq!(outlook.inspection_progress, 100.0);
    }

    #[test]
    fn test_progress_midway() {
        // 100-day cycle, 25 days remaining
        let outlook = assess(Some(d(2024, 1, 1)), Some(d(2024, 4, 10)), d(2024, 3, 16));
        assert_eq!(outlook.days_to_inspection, Some(25));
        assert_eq!(outlook.inspection_progress, 25.0);
    }

    #[test]
    fn test_progress_clamped_when_overdue() {
        let outlook = assess(Some(d(2024, 1, 1)), Some(d(2024, 2, 1)), d(2024, 3, 1));
        assert!(outlook.days_to_inspection.unwrap() < 0);
        assert_eq!(outlook.inspection_progress, 0.0);
    }

    #[test]
    fn test_degenerate_cycle() {
        // last >= next: 0 when overdue, 100 otherwise
        let overdue = assess(Some(d(2024, 5, 1)), Some(d(2024, 4, 1)), d(2024, 4, 2));
        assert_eq!(overdue.inspection_progress, 0.0);
        let not_due = assess(Some(d(2024, 5, 1)), Some(d(2024, 4, 1)), d(2024, 3, 31));
        assert_eq!(not_due.inspection_progress, 100.0);
    }

    #[test]
    fn test_fallback_cycle_without_last_inspection() {
        let far = assess(None, Some(d(2026, 1, 1)), d(2024, 1, 1));
        assert_eq!(far.inspection_progress, 100.0);
        let overdue = assess(None, Some(d(2024, 1, 1)), d(2024, 1, 2));
        assert_eq!(overdue.inspection_progress, 0.0);
        // 73 days out of 365 = 20%
        let partial = assess(None, Some(d(2024, 3, 14)), d(2024, 1, 1));
        assert_eq!(partial.days_to_inspection, Some(73));
        assert_eq!(partial.inspection_progress, 20.0);
    }

    #[test]
    fn test_progress_rounding() {
        // 1 of 3 days remaining = 33.333...% -> 33.33
        let outlook = assess(Some(d(2024, 1, 1)), Some(d(2024, 1, 4)), d(2024, 1, 3));
        assert_eq!(outlook.inspection_progress, 33.33);
    }

    #[test]
    fn test_status_expired_iff_negative() {
        assert_eq!(status_for(Some(-1)), InspectionStatus::Expired);
        assert_eq!(status_for(Some(0)), InspectionStatus::Urgent);
    }

    #[test]
    fn test_status_bands_partition_at_90_and_180_days() {
        assert_eq!(status_for(Some(90)), InspectionStatus::Urgent);
        assert_eq!(status_for(Some(91)), InspectionStatus::Warning);
        assert_eq!(status_for(Some(180)), InspectionStatus::Warning);
        assert_eq!(status_for(Some(181)), InspectionStatus::Normal);
        assert_eq!(status_for(None), InspectionStatus::NoInspection);
    }

    #[test]
    fn test_add_months_plain() {
        assert_eq!(add_months(d(2024, 1, 15), 6), Some(d(2024, 7, 15)));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_months(d(2023, 8, 31), 6), Some(d(2024, 2, 29)));
    }

    #[test]
    fn test_add_months_zero() {
        assert_eq!(add_months(d(2024, 3, 10), 0), Some(d(2024, 3, 10)));
    }
}
