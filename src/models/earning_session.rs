use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// A timed interval during which money accrues against one salary configuration.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct EarningSession {
    pub id: Uuid,
    pub salary_configuration_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub total_earned: f64,
    pub is_active: bool,
}

impl EarningSession {
    pub fn started(salary_configuration_id: Uuid, session_start: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            salary_configuration_id,
            session_start,
            session_end: None,
            total_earned: 0.0,
            is_active: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarningsUpdateRequest {
    #[validate(range(min = 0.0))]
    pub total_earned: f64,
}

#[derive(Serialize, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarningSessionResponse {
    pub id: Uuid,
    pub salary_configuration_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub total_earned: f64,
    pub is_active: bool,
}

impl From<&EarningSession> for EarningSessionResponse {
    fn from(value: &EarningSession) -> Self {
        Self {
            id: value.id,
            salary_configuration_id: value.salary_configuration_id,
            session_start: value.session_start,
            session_end: value.session_end,
            total_earned: value.total_earned,
            is_active: value.is_active,
        }
    }
}

/// Session together with what it has accrued up to the moment of the request.
///
/// For a settled session `accrued_so_far` equals `total_earned`.
#[derive(Serialize, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarningSessionDetailResponse {
    #[serde(flatten)]
    pub session: EarningSessionResponse,
    pub elapsed_minutes: f64,
    pub accrued_so_far: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_session_is_active_with_nothing_earned() {
        let configuration_id = Uuid::new_v4();
        let start = Utc::now();
        let session = EarningSession::started(configuration_id, start);

        assert!(session.is_active);
        assert_eq!(session.salary_configuration_id, configuration_id);
        assert_eq!(session.session_start, start);
        assert_eq!(session.session_end, None);
        assert_eq!(session.total_earned, 0.0);
    }

    #[test]
    fn test_earnings_update_rejects_negative_amount() {
        assert!(EarningsUpdateRequest { total_earned: 12.5 }.validate().is_ok());
        assert!(EarningsUpdateRequest { total_earned: 0.0 }.validate().is_ok());
        assert!(EarningsUpdateRequest { total_earned: -0.01 }.validate().is_err());
    }

    #[test]
    fn test_detail_response_flattens_session_fields() {
        let session = EarningSession::started(Uuid::new_v4(), Utc::now());
        let detail = EarningSessionDetailResponse {
            session: EarningSessionResponse::from(&session),
            elapsed_minutes: 1.5,
            accrued_so_far: 0.72,
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["totalEarned"], 0.0);
        assert_eq!(json["accruedSoFar"], 0.72);
        assert!(json["sessionEnd"].is_null());
    }
}
