use crate::error::app_error::AppError;
use crate::models::rates::{EarningRates, RateBreakdown};
use crate::models::salary_configuration::SalaryConfiguration;

/// Average number of weeks in a month. Fixed, not calendar-aware.
pub const WEEKS_PER_MONTH: f64 = 4.33;

pub const MINUTES_PER_HOUR: f64 = 60.0;

const MAX_DAILY_HOURS: f64 = 24.0;
const MAX_WEEKLY_DAYS: f64 = 7.0;

// Above this an f64 has no fractional digits left, and scaling by 100 could overflow.
const CENT_PRECISION_LIMIT: f64 = 1e15;

/// Rounds half away from zero to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    if value.abs() >= CENT_PRECISION_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// Fails when a derived figure overflowed, so callers never see `inf` or `NaN`.
pub fn ensure_finite(figure: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::invalid_configuration(format!("{} is out of range", figure)))
    }
}

pub fn monthly_hours(configuration: &SalaryConfiguration) -> f64 {
    configuration.daily_hours * configuration.weekly_days * WEEKS_PER_MONTH
}

/// Checks the configuration invariant independently of request validation,
/// so direct callers cannot produce infinite or NaN rates.
pub fn validate_terms(configuration: &SalaryConfiguration) -> Result<(), AppError> {
    let SalaryConfiguration {
        monthly_salary,
        daily_hours,
        weekly_days,
        ..
    } = *configuration;

    if !monthly_salary.is_finite() || monthly_salary <= 0.0 {
        return Err(AppError::invalid_configuration(format!(
            "monthly salary must be greater than 0, got {}",
            monthly_salary
        )));
    }

    if !daily_hours.is_finite() || daily_hours <= 0.0 || daily_hours > MAX_DAILY_HOURS {
        return Err(AppError::invalid_configuration(format!(
            "daily hours must be within (0, {}], got {}",
            MAX_DAILY_HOURS, daily_hours
        )));
    }

    if !weekly_days.is_finite() || weekly_days <= 0.0 || weekly_days > MAX_WEEKLY_DAYS {
        return Err(AppError::invalid_configuration(format!(
            "weekly days must be within (0, {}], got {}",
            MAX_WEEKLY_DAYS, weekly_days
        )));
    }

    Ok(())
}

pub fn hourly_rate(configuration: &SalaryConfiguration) -> Result<f64, AppError> {
    validate_terms(configuration)?;

    let hours = monthly_hours(configuration);
    // Unreachable after validation unless the product underflows.
    if hours <= 0.0 {
        return Err(AppError::invalid_configuration("monthly hours must be greater than 0"));
    }

    Ok(configuration.monthly_salary / hours)
}

pub fn rate_breakdown(configuration: &SalaryConfiguration) -> Result<RateBreakdown, AppError> {
    let per_hour = hourly_rate(configuration)?;

    Ok(RateBreakdown {
        per_minute: ensure_finite("per-minute rate", per_hour / MINUTES_PER_HOUR)?,
        per_hour: ensure_finite("hourly rate", per_hour)?,
        per_day: ensure_finite("daily rate", per_hour * configuration.daily_hours)?,
        monthly_hours: monthly_hours(configuration),
    })
}

pub fn calculate_rates(configuration: &SalaryConfiguration) -> Result<EarningRates, AppError> {
    let breakdown = rate_breakdown(configuration)?;

    Ok(EarningRates {
        per_minute: round_to_cents(breakdown.per_minute),
        per_hour: round_to_cents(breakdown.per_hour),
        per_day: round_to_cents(breakdown.per_day),
        monthly_hours: round_to_cents(breakdown.monthly_hours),
    })
}
