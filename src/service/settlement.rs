use crate::error::app_error::AppError;
use crate::models::salary_configuration::SalaryConfiguration;
use crate::service::rates::{MINUTES_PER_HOUR, ensure_finite, hourly_rate, round_to_cents};
use chrono::{DateTime, Utc};

/// Outcome of closing an earning session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub elapsed_minutes: f64,
    pub earned: f64,
    pub ended_at: DateTime<Utc>,
}

/// Minutes between `start` and `now` with millisecond precision.
///
/// Clock skew can put `now` before `start`; that counts as zero elapsed time.
pub fn elapsed_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - start).num_milliseconds().max(0);
    millis as f64 / 1000.0 / MINUTES_PER_HOUR
}

fn earned_for(configuration: &SalaryConfiguration, minutes: f64) -> Result<f64, AppError> {
    let per_hour = hourly_rate(configuration)?;
    ensure_finite("earned amount", round_to_cents(minutes * (per_hour / MINUTES_PER_HOUR)))
}

/// Amount accrued so far by a session that is still running.
pub fn accrued(configuration: &SalaryConfiguration, start: DateTime<Utc>, now: DateTime<Utc>) -> Result<f64, AppError> {
    earned_for(configuration, elapsed_minutes(start, now))
}

pub fn settle(configuration: &SalaryConfiguration, start: DateTime<Utc>, now: DateTime<Utc>) -> Result<Settlement, AppError> {
    let minutes = elapsed_minutes(start, now);
    let earned = earned_for(configuration, minutes)?;

    Ok(Settlement {
        elapsed_minutes: minutes,
        earned,
        ended_at: now,
    })
}
