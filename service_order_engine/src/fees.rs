//! Fee schedules.
//!
//! A fee schedule holds the rates and percentages a facility is billed
//! at: admin, platform and processing percentages, overtime and holiday
//! multipliers and the hourly supervisor fee.  Schedules are stored as
//! JSON files, one per schedule, and loaded from a directory at startup.

use crate::error::OrderError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Code of the built-in schedule used when an order names none.
pub const STANDARD_SCHEDULE: &str = "DEFAULT";

/// Billing terms applied when pricing a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    /// Identifier referenced by service orders, e.g. `"DEFAULT"` or
    /// `"HOSPITALITY-2025"`.
    pub code: String,
    pub admin_cost_percent: f64,
    pub platform_fee_percent: f64,
    pub processing_fee_percent: f64,
    pub overtime_rate_multiplier: f64,
    pub holiday_rate_multiplier: f64,
    pub hourly_supervisor_fee: f64,
}

impl FeeSchedule {
    /// The schedule registered under [`STANDARD_SCHEDULE`] unless a file
    /// overrides it.
    pub fn standard() -> Self {
        Self {
            code: STANDARD_SCHEDULE.to_string(),
            admin_cost_percent: 10.0,
            platform_fee_percent: 5.0,
            processing_fee_percent: 3.0,
            overtime_rate_multiplier: 1.5,
            holiday_rate_multiplier: 1.5,
            hourly_supervisor_fee: 5.0,
        }
    }

    /// Checks the schedule's terms: percentages within `0..=100`,
    /// multipliers of at least 1 and a non-negative supervisor fee.
    pub fn check(&self) -> Result<(), OrderError> {
        check_percent("adminCostPercent", self.admin_cost_percent)?;
        check_percent("platformFeePercent", self.platform_fee_percent)?;
        check_percent("processingFeePercent", self.processing_fee_percent)?;
        check_multiplier("overtimeRateMultiplier", self.overtime_rate_multiplier)?;
        check_multiplier("holidayRateMultiplier", self.holiday_rate_multiplier)?;
        if !(self.hourly_supervisor_fee >= 0.0) {
            return Err(OrderError::NegativeInput {
                field: "hourlySupervisorFee",
                value: self.hourly_supervisor_fee,
            });
        }
        Ok(())
    }
}

/// Rejects a percentage outside `0..=100`, NaN included.
pub fn check_percent(field: &'static str, value: f64) -> Result<(), OrderError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(OrderError::OutOfRange {
            field,
            value,
            expected: "between 0 and 100",
        })
    }
}

/// Rejects a rate multiplier below 1, NaN included.
pub fn check_multiplier(field: &'static str, value: f64) -> Result<(), OrderError> {
    if value >= 1.0 {
        Ok(())
    } else {
        Err(OrderError::OutOfRange {
            field,
            value,
            expected: "at least 1",
        })
    }
}

/// Load all fee schedules from a directory.
///
/// Every `.json` file is parsed as a [`FeeSchedule`].  Files that fail
/// to parse or carry out of range terms are skipped with a warning.  A
/// missing directory yields an empty list.
pub fn load_fee_schedules_from_dir(path: &Path) -> Result<Vec<FeeSchedule>> {
    let mut schedules = Vec::new();
    if !path.is_dir() {
        warn!(dir = %path.display(), "fee schedule directory not found");
        return Ok(schedules);
    }
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let file = entry.path();
        if !entry.file_type()?.is_file() || file.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let data = std::fs::read_to_string(&file)?;
        let schedule = match serde_json::from_str::<FeeSchedule>(&data) {
            Ok(schedule) => schedule,
            Err(err) => {
                warn!(file = %file.display(), error = %err, "failed to parse fee schedule");
                continue;
            }
        };
        if let Err(err) = schedule.check() {
            warn!(file = %file.display(), error = %err, "rejected fee schedule");
            continue;
        }
        schedules.push(schedule);
    }
    Ok(schedules)
}

/// Builds the lookup table used by the order desk: the standard
/// schedule plus everything in `path`, later entries replacing earlier
/// ones with the same code.
pub fn fee_schedule_registry(path: &Path) -> Result<HashMap<String, FeeSchedule>> {
    let mut registry = HashMap::new();
    registry.insert(STANDARD_SCHEDULE.to_string(), FeeSchedule::standard());
    for schedule in load_fee_schedules_from_dir(path)? {
        registry.insert(schedule.code.clone(), schedule);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    const HOSPITALITY: &str = r#"{
        "code": "HOSPITALITY",
        "adminCostPercent": 12,
        "platformFeePercent": 4,
        "processingFeePercent": 2.9,
        "overtimeRateMultiplier": 1.5,
        "holidayRateMultiplier": 2,
        "hourlySupervisorFee": 6.5
    }"#;

    #[test]
    fn test_load_skips_invalid_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hospitality.json", HOSPITALITY);
        write(&dir, "broken.json", "{ not json");
        write(&dir, "notes.txt", "ignored");
        write(
            &dir,
            "greedy.json",
            &HOSPITALITY.replace("\"HOSPITALITY\"", "\"GREEDY\"").replace("\"adminCostPercent\": 12", "\"adminCostPercent\": 120"),
        );

        let schedules = load_fee_schedules_from_dir(dir.path()).unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].code, "HOSPITALITY");
        assert_eq!(schedules[0].holiday_rate_multiplier, 2.0);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let schedules = load_fee_schedules_from_dir(&dir.path().join("nope")).unwrap();
        assert!(schedules.is_empty());
    }

    #[test]
    fn test_registry_keeps_standard_and_allows_override() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hospitality.json", HOSPITALITY);
        let registry = fee_schedule_registry(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry[STANDARD_SCHEDULE], FeeSchedule::standard());

        write(&dir, "default.json", &HOSPITALITY.replace("\"HOSPITALITY\"", "\"DEFAULT\""));
        let registry = fee_schedule_registry(dir.path()).unwrap();
        assert_eq!(registry[STANDARD_SCHEDULE].admin_cost_percent, 12.0);
    }

    #[test]
    fn test_check_rejects_bad_terms() {
        assert!(FeeSchedule::standard().check().is_ok());
        let low = FeeSchedule { overtime_rate_multiplier: 0.9, ..FeeSchedule::standard() };
        assert!(low.check().unwrap_err().to_string().contains("overtimeRateMultiplier"));
        let nan = FeeSchedule { platform_fee_percent: f64::NAN, ..FeeSchedule::standard() };
        assert!(matches!(nan.check(), Err(OrderError::OutOfRange { field: "platformFeePercent", .. })));
        let negative = FeeSchedule { hourly_supervisor_fee: -1.0, ..FeeSchedule::standard() };
        assert!(matches!(negative.check(), Err(OrderError::NegativeInput { .. })));
    }
}
