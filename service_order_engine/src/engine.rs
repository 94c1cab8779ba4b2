//! Job pricing engine.
//!
//! The `engine` module turns a [`JobPricingInput`] into a
//! [`JobPricingResult`].  Pricing is a pure function: it performs no
//! I/O, holds no state and never fails, so it can be re-run on every
//! change of the order form.  [`price_batch`] uses the [`rayon`] crate
//! to price many jobs across multiple CPU cores.

use crate::models::{JobPricingInput, JobPricingResult};
use rayon::prelude::*;

/// Hours per day paid at the normal rate.  Anything beyond is overtime.
pub const OVERTIME_THRESHOLD_HOURS: f64 = 8.0;

/// Jobs requesting at least this many workers are charged a supervisor fee.
pub const SUPERVISOR_VACANCY_THRESHOLD: f64 = 6.0;

/// Computes the full cost breakdown for one job.
///
/// Worker pay is split into normal and overtime hours and into
/// non-holiday and holiday days, and scaled by the vacancy count.  The
/// supervisor fee covers one supervisor for the whole job and follows
/// the same hour and day split.  Admin, platform and processing fees are
/// percentages of the resulting base amount.
///
/// Invalid numbers are not rejected here: a NaN or negative input shows
/// up in the output.  The only guarded case is the hourly rate with
/// fees, which is `0` when the job has no billable hours.
pub fn compute_job_pricing(input: &JobPricingInput) -> JobPricingResult {
    let normal_hours = input.total_hours_per_day.min(OVERTIME_THRESHOLD_HOURS);
    let overtime_hours = (input.total_hours_per_day - OVERTIME_THRESHOLD_HOURS).max(0.0);

    let holiday_days = input.holiday_days_count;
    let regular_days = input.working_days_count - holiday_days;
    let holiday_multiplier = input.holiday_rate_multiplier;

    // Worker pay
    let overtime_rate = input.hourly_rate * input.overtime_rate_multiplier;
    let holiday_overtime_rate = overtime_rate * holiday_multiplier;
    let total_overtime_pay = (overtime_hours * overtime_rate * regular_days
        + overtime_hours * holiday_overtime_rate * holiday_days)
        * input.vacancy_count;
    let regular_day_pay = input.hourly_rate * normal_hours * regular_days * input.vacancy_count;
    let holiday_day_pay =
        input.hourly_rate * holiday_multiplier * normal_hours * holiday_days * input.vacancy_count;

    // Supervisor pay
    let supervisor_fee_total = if input.vacancy_count >= SUPERVISOR_VACANCY_THRESHOLD {
        let fee = input.hourly_supervisor_fee;
        let overtime_fee = fee * input.overtime_rate_multiplier;
        let normal = normal_hours * fee * regular_days
            + normal_hours * fee * holiday_multiplier * holiday_days;
        let overtime = overtime_hours * overtime_fee * regular_days
            + overtime_hours * overtime_fee * holiday_multiplier * holiday_days;
        normal + overtime
    } else {
        0.0
    };

    let base_amount = regular_day_pay + holiday_day_pay + total_overtime_pay + supervisor_fee_total;
    let admin_cost_amount = base_amount * input.admin_cost_percent / 100.0;
    let platform_fee_amount = base_amount * input.platform_fee_percent / 100.0;
    let processing_fee_amount = base_amount * input.processing_fee_percent / 100.0;
    let total_estimated_cost =
        base_amount + admin_cost_amount + platform_fee_amount + processing_fee_amount;

    let billable_hours =
        input.total_hours_per_day * input.working_days_count * input.vacancy_count;
    let estimated_hourly_rate_with_fees = if billable_hours == 0.0 {
        0.0
    } else {
        total_estimated_cost / billable_hours
    };

    JobPricingResult {
        normal_hours,
        overtime_hours,
        total_overtime_pay,
        supervisor_fee_total,
        base_amount,
        admin_cost_amount,
        platform_fee_amount,
        processing_fee_amount,
        estimated_hourly_rate_with_fees,
        total_estimated_cost,
    }
}

/// Prices a batch of jobs in parallel.  Results are returned in the
/// same order as `inputs`.
pub fn price_batch(inputs: &[JobPricingInput]) -> Vec<JobPricingResult> {
    inputs.par_iter().map(compute_job_pricing).collect()
}
