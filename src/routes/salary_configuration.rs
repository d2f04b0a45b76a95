use crate::database::EarningsStore;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::earning_session::EarningSessionResponse;
use crate::models::rates::EarningRates;
use crate::models::salary_configuration::{SalaryConfigurationRequest, SalaryConfigurationResponse, SalaryConfigurationUpdateRequest};
use crate::service::earnings::EarningsService;
use chrono::Utc;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, patch, post};
use rocket_okapi::openapi;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

fn parse_configuration_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid salary configuration id", e))
}

/// Create a salary configuration
#[openapi(tag = "Salary Configurations")]
#[post("/", data = "<payload>")]
pub async fn create_configuration(
    store: &State<Arc<dyn EarningsStore>>,
    payload: JsonBody<SalaryConfigurationRequest>,
) -> Result<status::Custom<Json<SalaryConfigurationResponse>>, AppError> {
    payload.validate()?;

    let service = EarningsService::new(store.inner().as_ref());
    let configuration = service.create_configuration(&payload).await?;
    Ok(status::Custom(Status::Created, Json(SalaryConfigurationResponse::from(&configuration))))
}

/// Get a salary configuration by id
#[openapi(tag = "Salary Configurations")]
#[get("/<id>")]
pub async fn get_configuration(store: &State<Arc<dyn EarningsStore>>, id: String) -> Result<Json<SalaryConfigurationResponse>, AppError> {
    let configuration_id = parse_configuration_id(&id)?;
    let service = EarningsService::new(store.inner().as_ref());
    let configuration = service.get_configuration(&configuration_id).await?;
    Ok(Json(SalaryConfigurationResponse::from(&configuration)))
}

/// Update some fields of a salary configuration
#[openapi(tag = "Salary Configurations")]
#[patch("/<id>", data = "<payload>")]
pub async fn update_configuration(
    store: &State<Arc<dyn EarningsStore>>,
    id: String,
    payload: JsonBody<SalaryConfigurationUpdateRequest>,
) -> Result<Json<SalaryConfigurationResponse>, AppError> {
    let configuration_id = parse_configuration_id(&id)?;
    payload.validate()?;
    if payload.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let service = EarningsService::new(store.inner().as_ref());
    let configuration = service.update_configuration(&configuration_id, &payload).await?;
    Ok(Json(SalaryConfigurationResponse::from(&configuration)))
}

/// Derived per-minute, per-hour and per-day rates
#[openapi(tag = "Salary Configurations")]
#[get("/<id>/rates")]
pub async fn get_rates(store: &State<Arc<dyn EarningsStore>>, id: String) -> Result<Json<EarningRates>, AppError> {
    let configuration_id = parse_configuration_id(&id)?;
    let service = EarningsService::new(store.inner().as_ref());
    Ok(Json(service.rates_for(&configuration_id).await?))
}

/// Start an earning session, or return the one already running
///
/// Answers 201 when a session was opened and 200 when an active one was resumed.
#[openapi(tag = "Earning Sessions")]
#[post("/<id>/sessions")]
pub async fn start_session(store: &State<Arc<dyn EarningsStore>>, id: String) -> Result<status::Custom<Json<EarningSessionResponse>>, AppError> {
    let configuration_id = parse_configuration_id(&id)?;
    let service = EarningsService::new(store.inner().as_ref());
    let (session, created) = service.start_session(&configuration_id, Utc::now()).await?;

    let status = if created { Status::Created } else { Status::Ok };
    Ok(status::Custom(status, Json(EarningSessionResponse::from(&session))))
}

/// Get the active earning session of a configuration
#[openapi(tag = "Earning Sessions")]
#[get("/<id>/sessions/active")]
pub async fn get_active_session(store: &State<Arc<dyn EarningsStore>>, id: String) -> Result<Json<EarningSessionResponse>, AppError> {
    let configuration_id = parse_configuration_id(&id)?;
    let service = EarningsService::new(store.inner().as_ref());
    let session = service.active_session(&configuration_id).await?;
    Ok(Json(EarningSessionResponse::from(&session)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![
        create_configuration,
        get_configuration,
        update_configuration,
        get_rates,
        start_session,
        get_active_session
    ]
}
