use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use std::io::Cursor;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Salary configuration not found")]
    ConfigurationNotFound,
    #[error("Earning session not found")]
    SessionNotFound,
    #[error("Active session not found")]
    NoActiveSession,
    #[error("Invalid salary configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error")]
    UuidError {
        message: String,
        #[source]
        source: uuid::Error,
    },
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn uuid(message: impl Into<String>, source: uuid::Error) -> Self {
        Self::UuidError {
            message: message.into(),
            source,
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }

    /// Message shown to the caller. Internal faults never leak their source.
    pub fn public_message(&self) -> String {
        match self {
            AppError::UuidError { message, .. } => message.clone(),
            AppError::ConfigurationError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Db { .. } => Status::InternalServerError,
            AppError::ConfigurationNotFound => Status::NotFound,
            AppError::SessionNotFound => Status::NotFound,
            AppError::NoActiveSession => Status::NotFound,
            AppError::InvalidConfiguration(_) => Status::UnprocessableEntity,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::Conflict(_) => Status::Conflict,
            AppError::UuidError { .. } => Status::BadRequest,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::ConfigurationError(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let status = Status::from(&self);

        if status.class().is_server_error() {
            error!(
                error = ?self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "request failed"
            );
        } else {
            warn!(
                error = %self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "request rejected"
            );
        }

        let body = serde_json::json!({ "message": self.public_message() }).to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Bad Request"),
            ("404", "Not Found"),
            ("409", "Conflict"),
            ("422", "Unprocessable Entity"),
            ("500", "Internal Server Error"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_map_to_404() {
        assert_eq!(Status::from(&AppError::ConfigurationNotFound), Status::NotFound);
        assert_eq!(Status::from(&AppError::SessionNotFound), Status::NotFound);
        assert_eq!(Status::from(&AppError::NoActiveSession), Status::NotFound);
    }

    #[test]
    fn test_invalid_configuration_maps_to_422() {
        let error = AppError::invalid_configuration("daily_hours must be greater than 0");
        assert_eq!(Status::from(&error), Status::UnprocessableEntity);
        assert_eq!(error.public_message(), "Invalid salary configuration: daily_hours must be greater than 0");
    }

    #[test]
    fn test_db_error_hides_source() {
        let error = AppError::db("Failed to fetch configuration", sqlx::Error::PoolTimedOut);
        assert_eq!(Status::from(&error), Status::InternalServerError);
        assert_eq!(error.public_message(), "Internal server error");
    }

    #[test]
    fn test_configuration_error_is_internal() {
        let error = AppError::configuration("wildcard origins cannot be combined with credentials");
        assert_eq!(Status::from(&error), Status::InternalServerError);
        assert_eq!(error.to_string(), "Configuration error: wildcard origins cannot be combined with credentials");
        assert_eq!(error.public_message(), "Internal server error");
    }

    #[test]
    fn test_uuid_error_reports_its_context() {
        let source = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let error = AppError::uuid("Invalid session id", source);
        assert_eq!(Status::from(&error), Status::BadRequest);
        assert_eq!(error.public_message(), "Invalid session id");
    }
}
