//! Error types for service order handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while validating, quoting or submitting a service order.
///
/// The pricing calculator itself never fails; these errors come from the
/// validation that runs before it and from fee schedule lookup.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A required form field was not supplied.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The shift is shorter than the configured minimum.
    #[error("total hours must be at least {minimum}, got {hours}")]
    ShiftTooShort { hours: f64, minimum: f64 },

    /// A time of day could not be parsed.
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    /// A numeric input was negative or not a number.
    #[error("{field} must be a non-negative number, got {value}")]
    NegativeInput { field: &'static str, value: f64 },

    /// A value outside its permitted range, e.g. a percentage above 100.
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A count of days or workers with a fractional part.
    #[error("{field} must be a whole number, got {value}")]
    NotWholeNumber { field: &'static str, value: f64 },

    /// More holiday days than working days.
    #[error("holiday days ({holidays}) must be between 0 and the working days ({working})")]
    HolidayCountOutOfRange { holidays: f64, working: f64 },

    /// The order requests no workers.
    #[error("at least one vacancy is required")]
    NoVacancies,

    /// The order has no job days.
    #[error("at least one job day is required")]
    NoJobDays,

    /// The same date was listed twice.
    #[error("job day {0} is listed more than once")]
    DuplicateJobDay(NaiveDate),

    /// The named fee schedule is not registered.
    #[error("unknown fee schedule: {0}")]
    UnknownFeeSchedule(String),
}

impl OrderError {
    /// Returns the HTTP status code for this error.
    ///
    /// - Unknown fee schedule: 404 Not Found
    /// - Missing field, invalid time: 400 Bad Request
    /// - Everything else: 422 Unprocessable Entity
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownFeeSchedule(_) => StatusCode::NOT_FOUND,
            Self::MissingField(_) | Self::InvalidTime(_) => StatusCode::BAD_REQUEST,
            Self::ShiftTooShort { .. }
            | Self::NegativeInput { .. }
            | Self::OutOfRange { .. }
            | Self::NotWholeNumber { .. }
            | Self::HolidayCountOutOfRange { .. }
            | Self::NoVacancies
            | Self::NoJobDays
            | Self::DuplicateJobDay(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
