use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// A user's pay parameters, the input to every rate and settlement calculation.
///
/// `is_holiday` is stored and returned but no calculation reads it.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct SalaryConfiguration {
    pub id: Uuid,
    pub monthly_salary: f64,
    pub daily_hours: f64,
    pub weekly_days: f64,
    pub is_holiday: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalaryConfiguration {
    /// Applies the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: &SalaryConfigurationUpdateRequest) {
        if let Some(monthly_salary) = update.monthly_salary {
            self.monthly_salary = monthly_salary;
        }
        if let Some(daily_hours) = update.daily_hours {
            self.daily_hours = daily_hours;
        }
        if let Some(weekly_days) = update.weekly_days {
            self.weekly_days = weekly_days;
        }
        if let Some(is_holiday) = update.is_holiday {
            self.is_holiday = is_holiday;
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryConfigurationRequest {
    #[validate(range(min = 1.0))]
    pub monthly_salary: f64,
    #[validate(range(min = 1.0, max = 24.0))]
    pub daily_hours: f64,
    #[validate(range(min = 1.0, max = 7.0))]
    pub weekly_days: f64,
    pub is_holiday: Option<bool>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryConfigurationUpdateRequest {
    #[validate(range(min = 1.0))]
    pub monthly_salary: Option<f64>,
    #[validate(range(min = 1.0, max = 24.0))]
    pub daily_hours: Option<f64>,
    #[validate(range(min = 1.0, max = 7.0))]
    pub weekly_days: Option<f64>,
    pub is_holiday: Option<bool>,
}

impl SalaryConfigurationUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.monthly_salary.is_none() && self.daily_hours.is_none() && self.weekly_days.is_none() && self.is_holiday.is_none()
    }
}

#[derive(Serialize, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryConfigurationResponse {
    pub id: Uuid,
    pub monthly_salary: f64,
    pub daily_hours: f64,
    pub weekly_days: f64,
    pub is_holiday: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SalaryConfiguration> for SalaryConfigurationResponse {
    fn from(value: &SalaryConfiguration) -> Self {
        Self {
            id: value.id,
            monthly_salary: value.monthly_salary,
            daily_hours: value.daily_hours,
            weekly_days: value.weekly_days,
            is_holiday: value.is_holiday,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
