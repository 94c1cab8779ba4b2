//! Data models for the Service Order Engine.
//!
//! The `models` module defines the serialisable structs used as the
//! pricing engine's input and output, together with the job day type
//! that service orders are scheduled on.  They derive `Serialize` and
//! `Deserialize` with camelCase field names so they can be exchanged
//! with the web client unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters of one staffing job, as needed to price it.
///
/// All values are trusted by the calculator.  Callers are expected to
/// reject negative values and out of range holiday counts before
/// pricing; see [`crate::order::ServiceOrderDraft::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPricingInput {
    /// Scheduled hours for one work day, lunch break already
    /// subtracted.
    pub total_hours_per_day: f64,
    /// Base pay rate offered to a worker.
    pub hourly_rate: f64,
    /// Additional hourly rate paid for supervisory coverage.
    pub hourly_supervisor_fee: f64,
    /// Multiplier applied to the hourly rate beyond eight hours a day.
    pub overtime_rate_multiplier: f64,
    /// Multiplier applied on top of the normal or overtime rate on
    /// holidays.
    pub holiday_rate_multiplier: f64,
    /// Number of calendar days the job spans.
    pub working_days_count: f64,
    /// Number of those days flagged as holidays.
    pub holiday_days_count: f64,
    /// Number of workers requested.
    pub vacancy_count: f64,
    pub admin_cost_percent: f64,
    pub platform_fee_percent: f64,
    pub processing_fee_percent: f64,
}

/// Cost breakdown for a single job.
///
/// Amounts are kept at full precision.  Use [`JobPricingResult::summary`]
/// to obtain the values rounded to cents for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPricingResult {
    pub normal_hours: f64,
    pub overtime_hours: f64,
    pub total_overtime_pay: f64,
    /// Zero unless the job requests enough workers to need a supervisor.
    pub supervisor_fee_total: f64,
    /// Normal, holiday, overtime and supervisor pay combined.
    pub base_amount: f64,
    pub admin_cost_amount: f64,
    pub platform_fee_amount: f64,
    pub processing_fee_amount: f64,
    pub estimated_hourly_rate_with_fees: f64,
    /// `base_amount` plus every fee amount.
    pub total_estimated_cost: f64,
}

impl JobPricingResult {
    /// Returns the breakdown with every currency amount rounded to two
    /// decimal places.
    pub fn summary(&self) -> PricingSummary {
        PricingSummary {
            normal_hours: self.normal_hours,
            overtime_hours: self.overtime_hours,
            total_overtime_pay: round_cents(self.total_overtime_pay),
            supervisor_fee_total: round_cents(self.supervisor_fee_total),
            base_amount: round_cents(self.base_amount),
            admin_cost_amount: round_cents(self.admin_cost_amount),
            platform_fee_amount: round_cents(self.platform_fee_amount),
            processing_fee_amount: round_cents(self.processing_fee_amount),
            estimated_hourly_rate_with_fees: round_cents(self.estimated_hourly_rate_with_fees),
            total_estimated_cost: round_cents(self.total_estimated_cost),
        }
    }
}

/// Display form of a [`JobPricingResult`], rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    pub normal_hours: f64,
    pub overtime_hours: f64,
    pub total_overtime_pay: f64,
    pub supervisor_fee_total: f64,
    pub base_amount: f64,
    pub admin_cost_amount: f64,
    pub platform_fee_amount: f64,
    pub processing_fee_amount: f64,
    pub estimated_hourly_rate_with_fees: f64,
    pub total_estimated_cost: f64,
}

/// Rounds a currency amount to two decimal places, half away from zero.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// One calendar day a job is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDay {
    pub date: NaiveDate,
    /// Holiday days are paid at the holiday rate multiplier.
    #[serde(default)]
    pub holiday: bool,
}
