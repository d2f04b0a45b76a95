use crate::database::EarningsStore;
use crate::database::earning_session::EarningSessionRepository;
use crate::database::salary_configuration::SalaryConfigurationRepository;
use crate::error::app_error::AppError;
use crate::models::earning_session::EarningSession;
use crate::models::salary_configuration::{SalaryConfiguration, SalaryConfigurationRequest, SalaryConfigurationUpdateRequest};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct InMemoryState {
    configurations: HashMap<Uuid, SalaryConfiguration>,
    sessions: HashMap<Uuid, EarningSession>,
    // configuration id -> id of its running session
    active_sessions: HashMap<Uuid, Uuid>,
}

/// Volatile store. Every operation holds one lock, so start-or-resume and
/// settlement are atomic without further coordination.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EarningsStore for InMemoryRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait::async_trait]
impl SalaryConfigurationRepository for InMemoryRepository {
    async fn create_configuration(&self, request: &SalaryConfigurationRequest) -> Result<SalaryConfiguration, AppError> {
        let now = Utc::now();
        let configuration = SalaryConfiguration {
            id: Uuid::new_v4(),
            monthly_salary: request.monthly_salary,
            daily_hours: request.daily_hours,
            weekly_days: request.weekly_days,
            is_holiday: request.is_holiday.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.lock().await;
        state.configurations.insert(configuration.id, configuration.clone());
        Ok(configuration)
    }

    async fn get_configuration_by_id(&self, id: &Uuid) -> Result<Option<SalaryConfiguration>, AppError> {
        let state = self.state.lock().await;
        Ok(state.configurations.get(id).cloned())
    }

    async fn update_configuration(&self, id: &Uuid, update: &SalaryConfigurationUpdateRequest) -> Result<Option<SalaryConfiguration>, AppError> {
        let mut state = self.state.lock().await;
        let Some(configuration) = state.configurations.get_mut(id) else {
            return Ok(None);
        };

        configuration.apply(update);
        configuration.updated_at = Utc::now();
        Ok(Some(configuration.clone()))
    }
}

#[async_trait::async_trait]
impl EarningSessionRepository for InMemoryRepository {
    async fn find_active_session(&self, configuration_id: &Uuid) -> Result<Option<EarningSession>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .active_sessions
            .get(configuration_id)
            .and_then(|session_id| state.sessions.get(session_id))
            .cloned())
    }

    async fn start_session(&self, configuration_id: &Uuid, started_at: DateTime<Utc>) -> Result<(EarningSession, bool), AppError> {
        let mut state = self.state.lock().await;

        if !state.configurations.contains_key(configuration_id) {
            return Err(AppError::ConfigurationNotFound);
        }

        if let Some(existing) = state.active_sessions.get(configuration_id).and_then(|session_id| state.sessions.get(session_id)) {
            return Ok((existing.clone(), false));
        }

        let session = EarningSession::started(*configuration_id, started_at);
        state.active_sessions.insert(*configuration_id, session.id);
        state.sessions.insert(session.id, session.clone());
        Ok((session, true))
    }

    async fn get_session_by_id(&self, id: &Uuid) -> Result<Option<EarningSession>, AppError> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(id).cloned())
    }

    async fn update_session_earnings(&self, id: &Uuid, total_earned: f64) -> Result<Option<EarningSession>, AppError> {
        let mut state = self.state.lock().await;
        let Some(session) = state.sessions.get_mut(id) else {
            return Ok(None);
        };

        session.total_earned = total_earned;
        Ok(Some(session.clone()))
    }

    async fn settle_session(&self, id: &Uuid, ended_at: DateTime<Utc>, earned: f64) -> Result<Option<EarningSession>, AppError> {
        let mut state = self.state.lock().await;
        let Some(session) = state.sessions.get_mut(id).filter(|session| session.is_active) else {
            return Ok(None);
        };

        session.is_active = false;
        session.session_end = Some(ended_at);
        session.total_earned = earned;
        let settled = session.clone();

        state.active_sessions.remove(&settled.salary_configuration_id);
        Ok(Some(settled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_request;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_configuration_assigns_id_and_timestamps() {
        let repo = InMemoryRepository::new();
        let configuration = repo.create_configuration(&sample_request()).await.unwrap();

        assert!(!configuration.id.is_nil());
        assert!(!configuration.is_holiday);
        assert_eq!(configuration.created_at, configuration.updated_at);
        assert_eq!(repo.get_configuration_by_id(&configuration.id).await.unwrap(), Some(configuration));
    }

    #[tokio::test]
    async fn test_update_configuration_refreshes_updated_at() {
        let repo = InMemoryRepository::new();
        let created = repo.create_configuration(&sample_request()).await.unwrap();

        let update = SalaryConfigurationUpdateRequest {
            weekly_days: Some(4.0),
            ..Default::default()
        };
        let updated = repo.update_configuration(&created.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.weekly_days, 4.0);
        assert_eq!(updated.daily_hours, created.daily_hours);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_configuration_returns_none() {
        let repo = InMemoryRepository::new();
        let result = repo.update_configuration(&Uuid::new_v4(), &SalaryConfigurationUpdateRequest::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_start_session_requires_configuration() {
        let repo = InMemoryRepository::new();
        let result = repo.start_session(&Uuid::new_v4(), Utc::now()).await;
        assert!(matches!(result, Err(AppError::ConfigurationNotFound)));
    }

    #[tokio::test]
    async fn test_start_session_resumes_active_session() {
        let repo = InMemoryRepository::new();
        let configuration = repo.create_configuration(&sample_request()).await.unwrap();

        let (first, created) = repo.start_session(&configuration.id, Utc::now()).await.unwrap();
        assert!(created);
        let (second, created) = repo.start_session(&configuration.id, Utc::now()).await.unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(repo.find_active_session(&configuration.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_concurrent_starts_yield_one_session() {
        let repo = Arc::new(InMemoryRepository::new());
        let configuration = repo.create_configuration(&sample_request()).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let configuration_id = configuration.id;
                tokio::spawn(async move { repo.start_session(&configuration_id, Utc::now()).await })
            })
            .collect();

        let mut created_count = 0;
        let mut ids = Vec::new();
        for handle in handles {
            let (session, created) = handle.await.unwrap().unwrap();
            if created {
                created_count += 1;
            }
            ids.push(session.id);
        }

        assert_eq!(created_count, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[tokio::test]
    async fn test_settle_session_is_compare_and_swap() {
        let repo = InMemoryRepository::new();
        let configuration = repo.create_configuration(&sample_request()).await.unwrap();
        let (session, _) = repo.start_session(&configuration.id, Utc::now()).await.unwrap();
        let ended_at = Utc::now();

        let settled = repo.settle_session(&session.id, ended_at, 4.2).await.unwrap().unwrap();
        assert!(!settled.is_active);
        assert_eq!(settled.session_end, Some(ended_at));
        assert_eq!(settled.total_earned, 4.2);

        assert!(repo.settle_session(&session.id, Utc::now(), 10.0).await.unwrap().is_none());
        let stored = repo.get_session_by_id(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.total_earned, 4.2);
        assert_eq!(stored.session_end, Some(ended_at));
    }

    #[tokio::test]
    async fn test_settling_frees_configuration_for_a_new_session() {
        let repo = InMemoryRepository::new();
        let configuration = repo.create_configuration(&sample_request()).await.unwrap();
        let (first, _) = repo.start_session(&configuration.id, Utc::now()).await.unwrap();
        repo.settle_session(&first.id, Utc::now(), 1.0).await.unwrap();

        assert!(repo.find_active_session(&configuration.id).await.unwrap().is_none());

        let (second, created) = repo.start_session(&configuration.id, Utc::now()).await.unwrap();
        assert!(created);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_update_session_earnings_keeps_session_open() {
        let repo = InMemoryRepository::new();
        let configuration = repo.create_configuration(&sample_request()).await.unwrap();
        let (session, _) = repo.start_session(&configuration.id, Utc::now()).await.unwrap();

        let updated = repo.update_session_earnings(&session.id, 3.75).await.unwrap().unwrap();
        assert_eq!(updated.total_earned, 3.75);
        assert!(updated.is_active);
        assert!(updated.session_end.is_none());

        assert!(repo.update_session_earnings(&Uuid::new_v4(), 1.0).await.unwrap().is_none());
    }
}
