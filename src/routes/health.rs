use crate::database::EarningsStore;
use crate::models::health::HealthResponse;
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use std::sync::Arc;

/// Liveness probe; also names the storage backend in use
#[openapi(tag = "Health")]
#[get("/")]
pub async fn healthcheck(store: &State<Arc<dyn EarningsStore>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: store.backend_name(),
    })
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![healthcheck]
}
