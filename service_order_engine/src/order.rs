//! Service order workflow.
//!
//! A service order starts life as a [`ServiceOrderDraft`]: the loosely
//! filled order form, where any field may still be missing.  The
//! [`OrderDesk`] validates the draft, looks up its fee schedule, prices
//! it with [`compute_job_pricing`] and reports the outcome through its
//! [`Notifier`].

use crate::engine::compute_job_pricing;
use crate::error::OrderError;
use crate::fees::{check_multiplier, check_percent, FeeSchedule};
use crate::models::{JobDay, JobPricingInput, JobPricingResult, PricingSummary};
use crate::notify::{Notification, Notifier, Severity};
use crate::schedule::{calculate_hours, parse_time};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// The order form as submitted.  Every field is optional until
/// [`ServiceOrderDraft::validate`] runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceOrderDraft {
    pub facility_id: Option<String>,
    pub job_title: Option<String>,
    /// Fee schedule code; the desk's default schedule when absent.
    pub fee_schedule: Option<String>,
    /// Shift start, `HH:MM`.
    pub start_time: Option<String>,
    /// Shift end, `HH:MM`.  May be earlier than the start for night
    /// shifts.
    pub end_time: Option<String>,
    pub lunch_break_minutes: Option<u32>,
    pub hourly_rate: Option<f64>,
    pub vacancy_count: Option<u32>,
    pub job_days: Option<Vec<JobDay>>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub facility_id: String,
    pub job_title: String,
    pub fee_schedule: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub lunch_break_minutes: u32,
    pub total_hours_per_day: f64,
    pub hourly_rate: f64,
    pub vacancy_count: u32,
    pub job_days: Vec<JobDay>,
}

impl ServiceOrderDraft {
    /// Checks the draft and converts it to a [`ValidatedOrder`].
    ///
    /// Fails on the first missing or blank required field, an
    /// unparseable time, a shift shorter than `min_shift_hours` after the
    /// lunch break, a negative rate, zero vacancies or an empty or
    /// repeating list of job days.
    pub fn validate(&self, min_shift_hours: f64) -> Result<ValidatedOrder, OrderError> {
        let facility_id = required_text(&self.facility_id, "facilityId")?;
        let job_title = required_text(&self.job_title, "jobTitle")?;
        let start_time = parse_time(required(&self.start_time, "startTime")?)?;
        let end_time = parse_time(required(&self.end_time, "endTime")?)?;
        let lunch_break_minutes = self.lunch_break_minutes.unwrap_or(0);

        let total_hours_per_day = calculate_hours(start_time, end_time, lunch_break_minutes);
        if total_hours_per_day < min_shift_hours {
            return Err(OrderError::ShiftTooShort {
                hours: total_hours_per_day,
                minimum: min_shift_hours,
            });
        }

        let hourly_rate = *required(&self.hourly_rate, "hourlyRate")?;
        non_negative("hourlyRate", hourly_rate)?;

        let vacancy_count = *required(&self.vacancy_count, "vacancyCount")?;
        if vacancy_count == 0 {
            return Err(OrderError::NoVacancies);
        }

        let job_days = required(&self.job_days, "jobDays")?.clone();
        if job_days.is_empty() {
            return Err(OrderError::NoJobDays);
        }
        let mut seen = HashSet::new();
        for day in &job_days {
            if !seen.insert(day.date) {
                return Err(OrderError::DuplicateJobDay(day.date));
            }
        }

        Ok(ValidatedOrder {
            facility_id,
            job_title,
            fee_schedule: self.fee_schedule.clone(),
            start_time,
            end_time,
            lunch_break_minutes,
            total_hours_per_day,
            hourly_rate,
            vacancy_count,
            job_days,
        })
    }
}

impl ValidatedOrder {
    pub fn holiday_days_count(&self) -> usize {
        self.job_days.iter().filter(|day| day.holiday).count()
    }

    /// Combines the order with the terms of `schedule` into the
    /// calculator's input.
    pub fn pricing_input(&self, schedule: &FeeSchedule) -> JobPricingInput {
        JobPricingInput {
            total_hours_per_day: self.total_hours_per_day,
            hourly_rate: self.hourly_rate,
            hourly_supervisor_fee: schedule.hourly_supervisor_fee,
            overtime_rate_multiplier: schedule.overtime_rate_multiplier,
            holiday_rate_multiplier: schedule.holiday_rate_multiplier,
            working_days_count: self.job_days.len() as f64,
            holiday_days_count: self.holiday_days_count() as f64,
            vacancy_count: f64::from(self.vacancy_count),
            admin_cost_percent: schedule.admin_cost_percent,
            platform_fee_percent: schedule.platform_fee_percent,
            processing_fee_percent: schedule.processing_fee_percent,
        }
    }
}

/// A priced service order, ready to be sent to the backend.
///
/// Carries the raw calculator input next to the computed breakdown so
/// the receiver can audit the figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub facility_id: String,
    pub job_title: String,
    pub fee_schedule: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub lunch_break_minutes: u32,
    pub job_days: Vec<JobDay>,
    pub pricing_input: JobPricingInput,
    pub pricing: JobPricingResult,
    pub summary: PricingSummary,
}

/// Rejects pricing input the calculator is not meant to see: negative
/// or NaN amounts, fractional day and vacancy counts, zero vacancies,
/// percentages outside `0..=100`, multipliers below 1 and holiday counts
/// above `working_days_count`.  Run before pricing input that did not
/// come through [`ServiceOrderDraft::validate`].
pub fn check_pricing_input(input: &JobPricingInput) -> Result<(), OrderError> {
    non_negative("totalHoursPerDay", input.total_hours_per_day)?;
    non_negative("hourlyRate", input.hourly_rate)?;
    non_negative("hourlySupervisorFee", input.hourly_supervisor_fee)?;
    check_multiplier("overtimeRateMultiplier", input.overtime_rate_multiplier)?;
    check_multiplier("holidayRateMultiplier", input.holiday_rate_multiplier)?;
    check_percent("adminCostPercent", input.admin_cost_percent)?;
    check_percent("platformFeePercent", input.platform_fee_percent)?;
    check_percent("processingFeePercent", input.processing_fee_percent)?;
    whole_count("workingDaysCount", input.working_days_count)?;
    whole_count("holidayDaysCount", input.holiday_days_count)?;
    whole_count("vacancyCount", input.vacancy_count)?;
    if input.vacancy_count < 1.0 {
        return Err(OrderError::NoVacancies);
    }
    if input.holiday_days_count > input.working_days_count {
        return Err(OrderError::HolidayCountOutOfRange {
            holidays: input.holiday_days_count,
            working: input.working_days_count,
        });
    }
    Ok(())
}

fn required<'a, T>(value: &'a Option<T>, field: &'static str) -> Result<&'a T, OrderError> {
    value.as_ref().ok_or(OrderError::MissingField(field))
}

/// Like [`required`], but a blank string counts as missing.
fn required_text(value: &Option<String>, field: &'static str) -> Result<String, OrderError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(OrderError::MissingField(field))
}

fn whole_count(field: &'static str, value: f64) -> Result<(), OrderError> {
    non_negative(field, value)?;
    if value.fract() == 0.0 {
        Ok(())
    } else {
        Err(OrderError::NotWholeNumber { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), OrderError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(OrderError::NegativeInput { field, value })
    }
}

/// Validates, prices and announces service orders.
pub struct OrderDesk {
    fee_schedules: HashMap<String, FeeSchedule>,
    default_schedule: String,
    min_shift_hours: f64,
    notifier: Arc<dyn Notifier>,
}

impl OrderDesk {
    pub fn new(
        fee_schedules: HashMap<String, FeeSchedule>,
        default_schedule: impl Into<String>,
        min_shift_hours: f64,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fee_schedules,
            default_schedule: default_schedule.into(),
            min_shift_hours,
            notifier,
        }
    }

    /// Registered fee schedules, sorted by code.
    pub fn fee_schedules(&self) -> Vec<&FeeSchedule> {
        let mut schedules: Vec<&FeeSchedule> = self.fee_schedules.values().collect();
        schedules.sort_by(|a, b| a.code.cmp(&b.code));
        schedules
    }

    pub fn fee_schedule(&self, code: &str) -> Result<&FeeSchedule, OrderError> {
        self.fee_schedules
            .get(code)
            .ok_or_else(|| OrderError::UnknownFeeSchedule(code.to_string()))
    }

    /// Prices a draft.  Failures are shown to the user through the
    /// notifier before being returned.
    pub fn quote(&self, draft: &ServiceOrderDraft) -> Result<ServiceOrder, OrderError> {
        self.price(draft).map_err(|err| {
            self.notifier.show(Notification::new(
                Severity::Error,
                "Invalid service order",
                err.to_string(),
            ));
            err
        })
    }

    /// Prices a draft and confirms its creation to the user.
    pub fn submit(&self, draft: &ServiceOrderDraft) -> Result<ServiceOrder, OrderError> {
        let order = self.quote(draft)?;
        info!(
            facility = %order.facility_id,
            job = %order.job_title,
            days = order.job_days.len(),
            total = order.summary.total_estimated_cost,
            "service order created"
        );
        self.notifier.show(Notification::new(
            Severity::Success,
            "Service order created",
            format!(
                "{} at {}: estimated total {:.2}",
                order.job_title, order.facility_id, order.summary.total_estimated_cost
            ),
        ));
        Ok(order)
    }

    fn price(&self, draft: &ServiceOrderDraft) -> Result<ServiceOrder, OrderError> {
        let order = draft.validate(self.min_shift_hours)?;
        let code = order.fee_schedule.as_deref().unwrap_or(&self.default_schedule);
        let schedule = self.fee_schedule(code)?;
        let pricing_input = order.pricing_input(schedule);
        let pricing = compute_job_pricing(&pricing_input);
        debug!(
            schedule = %schedule.code,
            base = pricing.base_amount,
            total = pricing.total_estimated_cost,
            "priced service order"
        );
        Ok(ServiceOrder {
            facility_id: order.facility_id,
            job_title: order.job_title,
            fee_schedule: schedule.code.clone(),
            start_time: order.start_time,
            end_time: order.end_time,
            lunch_break_minutes: order.lunch_break_minutes,
            job_days: order.job_days,
            pricing_input,
            summary: pricing.summary(),
            pricing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::STANDARD_SCHEDULE;
    use crate::notify::RecordingNotifier;
    use chrono::NaiveDate;

    fn day(d: u32, holiday: bool) -> JobDay {
        JobDay {
            date: NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
            holiday,
        }
    }

    fn draft() -> ServiceOrderDraft {
        ServiceOrderDraft {
            facility_id: Some("fac-17".into()),
            job_title: Some("Warehouse associate".into()),
            fee_schedule: None,
            start_time: Some("08:00".into()),
            end_time: Some("16:30".into()),
            lunch_break_minutes: Some(30),
            hourly_rate: Some(20.0),
            vacancy_count: Some(1),
            job_days: Some((2..=6).map(|d| day(d, false)).collect()),
        }
    }

    fn desk() -> (OrderDesk, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut schedules = HashMap::new();
        schedules.insert(STANDARD_SCHEDULE.to_string(), FeeSchedule::standard());
        let desk = OrderDesk::new(schedules, STANDARD_SCHEDULE, 7.0, notifier.clone());
        (desk, notifier)
    }

    #[test]
    fn test_validate_builds_pricing_input() {
        let order = draft().validate(7.0).unwrap();
        assert_eq!(order.total_hours_per_day, 8.0);
        let input = order.pricing_input(&FeeSchedule::standard());
        assert_eq!(input.working_days_count, 5.0);
        assert_eq!(input.holiday_days_count, 0.0);
        assert_eq!(input.vacancy_count, 1.0);
        assert_eq!(input.admin_cost_percent, 10.0);
    }

    #[test]
    fn test_validate_reports_missing_times() {
        let no_start = ServiceOrderDraft { start_time: None, ..draft() };
        assert!(matches!(no_start.validate(7.0), Err(OrderError::MissingField("startTime"))));
        let no_end = ServiceOrderDraft { end_time: None, ..draft() };
        assert!(matches!(no_end.validate(7.0), Err(OrderError::MissingField("endTime"))));
    }

    #[test]
    fn test_validate_rejects_short_shift() {
        let short = ServiceOrderDraft { end_time: Some("15:00".into()), ..draft() };
        match short.validate(7.0) {
            Err(OrderError::ShiftTooShort { hours, minimum }) => {
                assert_eq!(hours, 6.5);
                assert_eq!(minimum, 7.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative = ServiceOrderDraft { hourly_rate: Some(-1.0), ..draft() };
        assert!(matches!(negative.validate(7.0), Err(OrderError::NegativeInput { field: "hourlyRate", .. })));
        let nobody = ServiceOrderDraft { vacancy_count: Some(0), ..draft() };
        assert!(matches!(nobody.validate(7.0), Err(OrderError::NoVacancies)));
        let no_days = ServiceOrderDraft { job_days: Some(vec![]), ..draft() };
        assert!(matches!(no_days.validate(7.0), Err(OrderError::NoJobDays)));
        let twice = ServiceOrderDraft { job_days: Some(vec![day(2, false), day(2, true)]), ..draft() };
        assert!(matches!(twice.validate(7.0), Err(OrderError::DuplicateJobDay(_))));
    }

    #[test]
    fn test_check_pricing_input() {
        let order = draft().validate(7.0).unwrap();
        let input = order.pricing_input(&FeeSchedule::standard());
        assert!(check_pricing_input(&input).is_ok());
        let too_many = JobPricingInput { holiday_days_count: 6.0, ..input };
        assert!(matches!(check_pricing_input(&too_many), Err(OrderError::HolidayCountOutOfRange { .. })));
        let nan = JobPricingInput { hourly_rate: f64::NAN, ..input };
        assert!(matches!(check_pricing_input(&nan), Err(OrderError::NegativeInput { field: "hourlyRate", .. })));
    }

    fn valid_input() -> JobPricingInput {
        draft().validate(7.0).unwrap().pricing_input(&FeeSchedule::standard())
    }

    #[test]
    fn test_check_pricing_input_rejects_zero_vacancies() {
        let input = JobPricingInput { vacancy_count: 0.0, ..valid_input() };
        assert!(matches!(check_pricing_input(&input), Err(OrderError::NoVacancies)));
    }

    #[test]
    fn test_check_pricing_input_rejects_fractional_counts() {
        let half_worker = JobPricingInput { vacancy_count: 5.5, ..valid_input() };
        assert!(matches!(
            check_pricing_input(&half_worker),
            Err(OrderError::NotWholeNumber { field: "vacancyCount", .. })
        ));
        let half_day = JobPricingInput { working_days_count: 4.5, ..valid_input() };
        assert!(matches!(
            check_pricing_input(&half_day),
            Err(OrderError::NotWholeNumber { field: "workingDaysCount", .. })
        ));
        let half_holiday = JobPricingInput { holiday_days_count: 0.5, ..valid_input() };
        assert!(matches!(
            check_pricing_input(&half_holiday),
            Err(OrderError::NotWholeNumber { field: "holidayDaysCount", .. })
        ));
    }

    #[test]
    fn test_check_pricing_input_rejects_percent_above_hundred() {
        let input = JobPricingInput { admin_cost_percent: 250.0, ..valid_input() };
        let err = check_pricing_input(&input).unwrap_err();
        assert!(matches!(err, OrderError::OutOfRange { field: "adminCostPercent", .. }));
        assert_eq!(err.to_string(), "adminCostPercent must be between 0 and 100, got 250");
    }

    #[test]
    fn test_check_pricing_input_rejects_low_multipliers() {
        let overtime = JobPricingInput { overtime_rate_multiplier: 0.5, ..valid_input() };
        assert!(matches!(
            check_pricing_input(&overtime),
            Err(OrderError::OutOfRange { field: "overtimeRateMultiplier", .. })
        ));
        let holiday = JobPricingInput { holiday_rate_multiplier: 0.0, ..valid_input() };
        assert!(matches!(
            check_pricing_input(&holiday),
            Err(OrderError::OutOfRange { field: "holidayRateMultiplier", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let blank_facility = ServiceOrderDraft { facility_id: Some(String::new()), ..draft() };
        assert!(matches!(blank_facility.validate(7.0), Err(OrderError::MissingField("facilityId"))));
        let blank_title = ServiceOrderDraft { job_title: Some("   ".into()), ..draft() };
        assert!(matches!(blank_title.validate(7.0), Err(OrderError::MissingField("jobTitle"))));
        let padded = ServiceOrderDraft { job_title: Some("  Porter ".into()), ..draft() };
        assert_eq!(padded.validate(7.0).unwrap().job_title, "Porter");
    }

    #[test]
    fn test_submit_prices_and_notifies() {
        let (desk, notifier) = desk();
        let order = desk.submit(&draft()).unwrap();
        assert_eq!(order.fee_schedule, STANDARD_SCHEDULE);
        assert_eq!(order.pricing.base_amount, 800.0);
        assert_eq!(order.summary.total_estimated_cost, 944.0);
        let shown = notifier.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].severity, Severity::Success);
    }

    #[test]
    fn test_holiday_days_priced_at_holiday_rate() {
        let (desk, _) = desk();
        let draft = ServiceOrderDraft {
            job_days: Some(vec![day(2, false), day(3, true)]),
            ..draft()
        };
        let order = desk.quote(&draft).unwrap();
        assert_eq!(order.pricing_input.holiday_days_count, 1.0);
        // 8h * $20 + 8h * $30
        assert_eq!(order.pricing.base_amount, 400.0);
    }

    #[test]
    fn test_quote_failure_is_notified() {
        let (desk, notifier) = desk();
        let unknown = ServiceOrderDraft { fee_schedule: Some("NOPE".into()), ..draft() };
        assert!(matches!(desk.quote(&unknown), Err(OrderError::UnknownFeeSchedule(_))));
        let missing = ServiceOrderDraft { start_time: None, ..draft() };
        assert!(desk.submit(&missing).is_err());

        let shown = notifier.shown();
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|n| n.severity == Severity::Error));
        assert_eq!(shown[1].message, "missing required field: startTime");
    }
}
