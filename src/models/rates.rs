use rocket::serde::Serialize;
use schemars::JsonSchema;

/// Unrounded earning figures for one salary configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBreakdown {
    pub per_minute: f64,
    pub per_hour: f64,
    pub per_day: f64,
    pub monthly_hours: f64,
}

/// Earning figures rounded to cents, as exposed to clients.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarningRates {
    pub per_minute: f64,
    pub per_hour: f64,
    pub per_day: f64,
    pub monthly_hours: f64,
}
