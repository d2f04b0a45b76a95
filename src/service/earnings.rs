use crate::database::EarningsStore;
use crate::error::app_error::AppError;
use crate::models::earning_session::EarningSession;
use crate::models::rates::EarningRates;
use crate::models::salary_configuration::{SalaryConfiguration, SalaryConfigurationRequest, SalaryConfigurationUpdateRequest};
use crate::service::rates::{calculate_rates, validate_terms};
use crate::service::settlement::{accrued, elapsed_minutes, settle};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// A session as seen at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session: EarningSession,
    pub elapsed_minutes: f64,
    pub accrued_so_far: f64,
}

pub struct EarningsService<'a> {
    store: &'a dyn EarningsStore,
}

impl<'a> EarningsService<'a> {
    pub fn new(store: &'a dyn EarningsStore) -> Self {
        EarningsService { store }
    }

    pub async fn create_configuration(&self, request: &SalaryConfigurationRequest) -> Result<SalaryConfiguration, AppError> {
        let configuration = self.store.create_configuration(request).await?;
        info!(configuration_id = %configuration.id, "salary configuration created");
        Ok(configuration)
    }

    pub async fn get_configuration(&self, id: &Uuid) -> Result<SalaryConfiguration, AppError> {
        match self.store.get_configuration_by_id(id).await? {
            Some(configuration) => Ok(configuration),
            None => {
                debug!(configuration_id = %id, "salary configuration not found");
                Err(AppError::ConfigurationNotFound)
            }
        }
    }

    /// Partial update. The merged result must still satisfy the rate invariant.
    pub async fn update_configuration(&self, id: &Uuid, update: &SalaryConfigurationUpdateRequest) -> Result<SalaryConfiguration, AppError> {
        let mut merged = self.get_configuration(id).await?;
        merged.apply(update);
        validate_terms(&merged)?;

        let configuration = self.store.update_configuration(id, update).await?.ok_or(AppError::ConfigurationNotFound)?;
        info!(configuration_id = %configuration.id, "salary configuration updated");
        Ok(configuration)
    }

    pub async fn rates_for(&self, configuration_id: &Uuid) -> Result<EarningRates, AppError> {
        let configuration = self.get_configuration(configuration_id).await?;
        calculate_rates(&configuration)
    }

    /// Start-or-resume. The flag is `true` when a new session was opened.
    pub async fn start_session(&self, configuration_id: &Uuid, now: DateTime<Utc>) -> Result<(EarningSession, bool), AppError> {
        self.get_configuration(configuration_id).await?;

        let (session, created) = self.store.start_session(configuration_id, now).await?;
        if created {
            info!(configuration_id = %configuration_id, session_id = %session.id, "earning session started");
        } else {
            debug!(configuration_id = %configuration_id, session_id = %session.id, "resuming active earning session");
        }

        Ok((session, created))
    }

    pub async fn active_session(&self, configuration_id: &Uuid) -> Result<EarningSession, AppError> {
        self.get_configuration(configuration_id).await?;
        self.store.find_active_session(configuration_id).await?.ok_or(AppError::NoActiveSession)
    }

    pub async fn get_session(&self, session_id: &Uuid, now: DateTime<Utc>) -> Result<SessionSnapshot, AppError> {
        let session = self.store.get_session_by_id(session_id).await?.ok_or(AppError::SessionNotFound)?;

        if !session.is_active {
            let ended_at = session.session_end.unwrap_or(session.session_start);
            return Ok(SessionSnapshot {
                elapsed_minutes: elapsed_minutes(session.session_start, ended_at),
                accrued_so_far: session.total_earned,
                session,
            });
        }

        let configuration = self.get_configuration(&session.salary_configuration_id).await?;
        Ok(SessionSnapshot {
            elapsed_minutes: elapsed_minutes(session.session_start, now),
            accrued_so_far: accrued(&configuration, session.session_start, now)?,
            session,
        })
    }

    /// Settles an active session at `now`.
    ///
    /// Fails with `NoActiveSession` when the session is unknown, already
    /// settled, or settled concurrently between the read and the write.
    pub async fn end_session(&self, session_id: &Uuid, now: DateTime<Utc>) -> Result<EarningSession, AppError> {
        let session = self
            .store
            .get_session_by_id(session_id)
            .await?
            .filter(|session| session.is_active)
            .ok_or(AppError::NoActiveSession)?;

        let configuration = self.get_configuration(&session.salary_configuration_id).await?;
        let settlement = settle(&configuration, session.session_start, now)?;

        let settled = self
            .store
            .settle_session(session_id, settlement.ended_at, settlement.earned)
            .await?
            .ok_or(AppError::NoActiveSession)?;

        info!(
            session_id = %settled.id,
            configuration_id = %settled.salary_configuration_id,
            elapsed_minutes = settlement.elapsed_minutes,
            earned = settlement.earned,
            "earning session settled"
        );

        Ok(settled)
    }

    /// Overwrites `total_earned` without closing the session.
    pub async fn update_earnings(&self, session_id: &Uuid, total_earned: f64) -> Result<EarningSession, AppError> {
        let session = self
            .store
            .update_session_earnings(session_id, total_earned)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        debug!(session_id = %session.id, total_earned, "session earnings updated");
        Ok(session)
    }
}
