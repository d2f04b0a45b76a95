use crate::database::EarningsStore;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::earning_session::{EarningSessionDetailResponse, EarningSessionResponse, EarningsUpdateRequest};
use crate::service::earnings::EarningsService;
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

fn parse_session_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid session id", e))
}

/// Get a session with the time elapsed and the amount accrued so far
#[openapi(tag = "Earning Sessions")]
#[get("/<id>")]
pub async fn get_session(store: &State<Arc<dyn EarningsStore>>, id: String) -> Result<Json<EarningSessionDetailResponse>, AppError> {
    let session_id = parse_session_id(&id)?;
    let service = EarningsService::new(store.inner().as_ref());
    let snapshot = service.get_session(&session_id, Utc::now()).await?;

    Ok(Json(EarningSessionDetailResponse {
        session: EarningSessionResponse::from(&snapshot.session),
        elapsed_minutes: snapshot.elapsed_minutes,
        accrued_so_far: snapshot.accrued_so_far,
    }))
}

/// End an active session and record what it earned
#[openapi(tag = "Earning Sessions")]
#[post("/<id>/end")]
pub async fn end_session(store: &State<Arc<dyn EarningsStore>>, id: String) -> Result<Json<EarningSessionResponse>, AppError> {
    let session_id = parse_session_id(&id)?;
    let service = EarningsService::new(store.inner().as_ref());
    let session = service.end_session(&session_id, Utc::now()).await?;
    Ok(Json(EarningSessionResponse::from(&session)))
}

/// Overwrite the earned total of a session
#[openapi(tag = "Earning Sessions")]
#[put("/<id>/earnings", data = "<payload>")]
pub async fn put_earnings(
    store: &State<Arc<dyn EarningsStore>>,
    id: String,
    payload: JsonBody<EarningsUpdateRequest>,
) -> Result<Json<EarningSessionResponse>, AppError> {
    let session_id = parse_session_id(&id)?;
    payload.validate()?;

    let service = EarningsService::new(store.inner().as_ref());
    let session = service.update_earnings(&session_id, payload.total_earned).await?;
    Ok(Json(EarningSessionResponse::from(&session)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_session, end_session, put_earnings]
}
