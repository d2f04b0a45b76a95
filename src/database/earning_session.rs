use crate::database::postgres_repository::{PostgresRepository, is_foreign_key_violation};
use crate::error::app_error::AppError;
use crate::models::earning_session::EarningSession;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Attempts before giving up on reading back a session created concurrently.
const START_SESSION_ATTEMPTS: usize = 3;

#[async_trait::async_trait]
pub trait EarningSessionRepository: Send + Sync {
    async fn find_active_session(&self, configuration_id: &Uuid) -> Result<Option<EarningSession>, AppError>;
    /// Returns the active session for the configuration, creating one if none
    /// is running. The flag is `true` when this call created it.
    async fn start_session(&self, configuration_id: &Uuid, started_at: DateTime<Utc>) -> Result<(EarningSession, bool), AppError>;
    async fn get_session_by_id(&self, id: &Uuid) -> Result<Option<EarningSession>, AppError>;
    async fn update_session_earnings(&self, id: &Uuid, total_earned: f64) -> Result<Option<EarningSession>, AppError>;
    /// Closes the session only if it is still active. `None` means it was
    /// unknown or already settled; nothing is written in that case.
    async fn settle_session(&self, id: &Uuid, ended_at: DateTime<Utc>, earned: f64) -> Result<Option<EarningSession>, AppError>;
}

#[derive(sqlx::FromRow)]
struct StartedSessionRow {
    #[sqlx(flatten)]
    session: EarningSession,
    created: bool,
}

#[async_trait::async_trait]
impl EarningSessionRepository for PostgresRepository {
    async fn find_active_session(&self, configuration_id: &Uuid) -> Result<Option<EarningSession>, AppError> {
        let session = sqlx::query_as::<_, EarningSession>(
            r#"
            SELECT id, salary_configuration_id, session_start, session_end, total_earned, is_active
            FROM earning_session
            WHERE salary_configuration_id = $1
              AND is_active
            "#,
        )
        .bind(configuration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to fetch active session", e))?;

        Ok(session)
    }

    async fn start_session(&self, configuration_id: &Uuid, started_at: DateTime<Utc>) -> Result<(EarningSession, bool), AppError> {
        for _ in 0..START_SESSION_ATTEMPTS {
            // The partial unique index turns a concurrent second insert into a no-op.
            let row = sqlx::query_as::<_, StartedSessionRow>(
                r#"
                WITH inserted AS (
                    INSERT INTO earning_session (salary_configuration_id, session_start)
                    VALUES ($1, $2)
                    ON CONFLICT (salary_configuration_id) WHERE is_active DO NOTHING
                    RETURNING id, salary_configuration_id, session_start, session_end, total_earned, is_active
                )
                SELECT id, salary_configuration_id, session_start, session_end, total_earned, is_active, TRUE AS created
                FROM inserted
                UNION ALL
                SELECT id, salary_configuration_id, session_start, session_end, total_earned, is_active, FALSE AS created
                FROM earning_session
                WHERE salary_configuration_id = $1
                  AND is_active
                LIMIT 1
                "#,
            )
            .bind(configuration_id)
            .bind(started_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::ConfigurationNotFound
                } else {
                    AppError::db("Failed to start session", e)
                }
            })?;

            if let Some(row) = row {
                return Ok((row.session, row.created));
            }

            // Lost the race to a transaction that committed after this statement's snapshot.
            if let Some(session) = self.find_active_session(configuration_id).await? {
                return Ok((session, false));
            }
        }

        tracing::warn!(configuration_id = %configuration_id, "could not resolve active session after concurrent starts");
        Err(AppError::Conflict("session start raced with a concurrent request".to_string()))
    }

    async fn get_session_by_id(&self, id: &Uuid) -> Result<Option<EarningSession>, AppError> {
        let session = sqlx::query_as::<_, EarningSession>(
            r#"
            SELECT id, salary_configuration_id, session_start, session_end, total_earned, is_active
            FROM earning_session
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to fetch session", e))?;

        Ok(session)
    }

    async fn update_session_earnings(&self, id: &Uuid, total_earned: f64) -> Result<Option<EarningSession>, AppError> {
        let session = sqlx::query_as::<_, EarningSession>(
            r#"
            UPDATE earning_session
            SET total_earned = $2
            WHERE id = $1
            RETURNING id, salary_configuration_id, session_start, session_end, total_earned, is_active
            "#,
        )
        .bind(id)
        .bind(total_earned)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to update session earnings", e))?;

        Ok(session)
    }

    async fn settle_session(&self, id: &Uuid, ended_at: DateTime<Utc>, earned: f64) -> Result<Option<EarningSession>, AppError> {
        let session = sqlx::query_as::<_, EarningSession>(
            r#"
            UPDATE earning_session
            SET is_active = FALSE,
                session_end = $2,
                total_earned = $3
            WHERE id = $1
              AND is_active
            RETURNING id, salary_configuration_id, session_start, session_end, total_earned, is_active
            "#,
        )
        .bind(id)
        .bind(ended_at)
        .bind(earned)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to settle session", e))?;

        Ok(session)
    }
}
